use std::collections::HashMap;
use std::sync::OnceLock;

/// The six instructions the shell understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    ChangeDir,
    Folder,
    Trash,
    Date,
    Help,
    Exit,
}

/// Accepted spellings per instruction. The sets must stay pairwise disjoint;
/// an overlapping token would make dispatch ambiguous.
pub const CHANGE_DIR_SYNONYMS: &[&str] = &["cd", "c", "go"];
pub const FOLDER_SYNONYMS: &[&str] = &["folder", "f", "folders"];
pub const TRASH_SYNONYMS: &[&str] = &["trash", "t", "short"];
pub const DATE_SYNONYMS: &[&str] = &["date", "d", "when"];
pub const HELP_SYNONYMS: &[&str] = &["help", "h", "?", "what", "how"];
pub const EXIT_SYNONYMS: &[&str] = &["exit", "e", "leave", "l", "quit", "q"];

const SYNONYM_SETS: &[(CommandKind, &[&str])] = &[
    (CommandKind::ChangeDir, CHANGE_DIR_SYNONYMS),
    (CommandKind::Folder, FOLDER_SYNONYMS),
    (CommandKind::Trash, TRASH_SYNONYMS),
    (CommandKind::Date, DATE_SYNONYMS),
    (CommandKind::Help, HELP_SYNONYMS),
    (CommandKind::Exit, EXIT_SYNONYMS),
];

/// Single token-to-instruction table, built once on first use.
fn synonym_table() -> &'static HashMap<&'static str, CommandKind> {
    static TABLE: OnceLock<HashMap<&'static str, CommandKind>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        for (kind, tokens) in SYNONYM_SETS {
            for token in *tokens {
                let previous = table.insert(*token, *kind);
                debug_assert!(previous.is_none(), "token '{token}' appears in two sets");
            }
        }
        table
    })
}

impl CommandKind {
    /// Resolve a leading token, case-insensitively. `None` means the
    /// instruction was not recognized.
    pub fn lookup(token: &str) -> Option<CommandKind> {
        synonym_table().get(token.to_lowercase().as_str()).copied()
    }

    /// Help topic key for this instruction in the configuration's help table.
    pub fn help_topic(self) -> &'static str {
        match self {
            CommandKind::ChangeDir => "change",
            CommandKind::Folder => "folder",
            CommandKind::Trash => "trash",
            CommandKind::Date => "date",
            // help-about-help gets its own text
            CommandKind::Help => "help-twice",
            CommandKind::Exit => "exit",
        }
    }
}
