/// `:` commands and autocomplete ranking

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "owners",
    aliases: &["o", "owner"],
    description: "Pet owners",
  },
  Command {
    name: "pets",
    aliases: &["p", "pet"],
    description: "Registered pets",
  },
  Command {
    name: "vaccines",
    aliases: &["v", "vaccine"],
    description: "Vaccine catalogue",
  },
  Command {
    name: "stocks",
    aliases: &["s", "stock", "inventory"],
    description: "Vaccine stock lots",
  },
  Command {
    name: "records",
    aliases: &["r", "record", "vaccinations"],
    description: "Vaccination records",
  },
  Command {
    name: "codes",
    aliases: &["c", "code", "lookups"],
    description: "Species, breed and gender codes",
  },
  Command {
    name: "vets",
    aliases: &["vet", "veterinarians"],
    description: "Veterinarian accounts",
  },
  Command {
    name: "logout",
    aliases: &["signout"],
    description: "Sign out and clear the stored session",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit vaxvet",
  },
];

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.trim().to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = COMMANDS
    .iter()
    .filter_map(|cmd| rank(cmd, &input_lower).map(|priority| (cmd, priority)))
    .collect();

  // Stable, so ties keep declaration order
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

/// Lower is better; `None` when the command does not match at all.
fn rank(cmd: &Command, input: &str) -> Option<u32> {
  if cmd.name == input {
    Some(0)
  } else if cmd.aliases.contains(&input) {
    Some(1)
  } else if cmd.name.starts_with(input) {
    Some(2)
  } else if cmd.aliases.iter().any(|a| a.starts_with(input)) {
    Some(3)
  } else if cmd.name.contains(input) {
    Some(4)
  } else if cmd.aliases.iter().any(|a| a.contains(input)) {
    Some(5)
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match() {
    let suggestions = get_suggestions("owners");
    assert_eq!(suggestions[0].name, "owners");
  }

  #[test]
  fn test_alias_beats_prefix() {
    // "v" is an alias of vaccines and a prefix of vets
    let names: Vec<_> = get_suggestions("v").iter().map(|c| c.name).collect();
    assert_eq!(&names[..2], &["vaccines", "vets"]);
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("rec");
    assert_eq!(suggestions[0].name, "records");
  }

  #[test]
  fn test_fuzzy_match() {
    let suggestions = get_suggestions("ock");
    assert_eq!(suggestions[0].name, "stocks");
  }

  #[test]
  fn test_no_match() {
    assert!(get_suggestions("zzz").is_empty());
  }
}
