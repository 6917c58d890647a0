//! Command definitions for the command palette.

/// Definition of a palette command.
#[derive(Debug, Clone)]
pub struct Command {
    /// Primary name (e.g., "analyze") - without the leading slash.
    pub name: &'static str,
    /// Aliases (e.g., ["domain"]) - without leading slashes.
    pub aliases: &'static [&'static str],
    /// Short description shown in palette.
    pub description: &'static str,
}

impl Command {
    /// Returns true if this command matches the given filter (case-insensitive).
    /// Matches against name and all aliases.
    pub fn matches(&self, filter: &str) -> bool {
        let filter_lower = filter.to_lowercase();
        self.name.to_lowercase().contains(&filter_lower)
            || self
                .aliases
                .iter()
                .any(|a| a.to_lowercase().contains(&filter_lower))
    }

    /// Returns the display name with aliases, e.g., "sessions (switch)".
    pub fn display_name(&self) -> String {
        if self.aliases.is_empty() {
            self.name.to_string()
        } else {
            format!("{} ({})", self.name, self.aliases.join(", "))
        }
    }
}

/// Available commands.
pub const COMMANDS: &[Command] = &[
    Command {
        name: "analyze",
        aliases: &["domain"],
        description: "Analyze a domain and make it the chat topic",
    },
    Command {
        name: "clear",
        aliases: &[],
        description: "Clear chat history for the current session",
    },
    Command {
        name: "clear-docs",
        aliases: &["cleardocs"],
        description: "Remove all indexed documents from this session",
    },
    Command {
        name: "config",
        aliases: &["settings"],
        description: "Open config file in default editor",
    },
    Command {
        name: "delete",
        aliases: &[],
        description: "Delete the current session",
    },
    Command {
        name: "model",
        aliases: &["load-model"],
        description: "Load the local model on the backend",
    },
    Command {
        name: "new",
        aliases: &[],
        description: "Create a new session",
    },
    Command {
        name: "provider",
        aliases: &["llm"],
        description: "Choose the LLM provider for new sessions",
    },
    Command {
        name: "quit",
        aliases: &["q", "exit"],
        description: "Exit dia",
    },
    Command {
        name: "rename",
        aliases: &[],
        description: "Rename the current session",
    },
    Command {
        name: "sessions",
        aliases: &["switch"],
        description: "Browse and switch sessions",
    },
    Command {
        name: "status",
        aliases: &["backend"],
        description: "Show backend status",
    },
    Command {
        name: "sync",
        aliases: &[],
        description: "Re-crawl the analyzed domain for fresh content",
    },
    Command {
        name: "upload",
        aliases: &["docs"],
        description: "Upload documents into this session",
    },
    Command {
        name: "urls",
        aliases: &[],
        description: "Analyze specific URLs",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn find_command(name: &str) -> &'static Command {
        COMMANDS.iter().find(|c| c.name == name).unwrap()
    }

    #[test]
    fn test_command_matches_name() {
        let cmd = find_command("analyze");
        assert!(cmd.matches("analyze"));
        assert!(cmd.matches("ana"));
        assert!(cmd.matches("ANALYZE")); // case-insensitive
        assert!(!cmd.matches("quit"));
    }

    #[test]
    fn test_command_matches_alias() {
        let cmd = find_command("analyze");
        assert!(cmd.matches("domain"));
        assert!(cmd.matches("dom"));
        assert!(cmd.matches("DOMAIN")); // case-insensitive
    }

    #[test]
    fn test_command_display_name() {
        assert_eq!(find_command("analyze").display_name(), "analyze (domain)");
        assert_eq!(find_command("clear").display_name(), "clear");
        assert_eq!(
            find_command("clear-docs").display_name(),
            "clear-docs (cleardocs)"
        );
        assert_eq!(find_command("quit").display_name(), "quit (q, exit)");
        assert_eq!(find_command("sessions").display_name(), "sessions (switch)");
        assert_eq!(find_command("upload").display_name(), "upload (docs)");
    }

    #[test]
    fn test_commands_sorted_by_name() {
        let names: Vec<&str> = COMMANDS.iter().map(|c| c.name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
