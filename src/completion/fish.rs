//! fish completion script generation.
//!
//! The script has two parts: a preamble defining the helper predicates
//! `__<prog>_needs_command` and `__<prog>_starts_with`, followed by one
//! `complete` statement per rule. Every rule is gated on the exact command
//! path typed so far, so `gcloud config set --<TAB>` only offers the flags of
//! `config set`.

use serde::{Deserialize, Serialize};

use crate::completion::tree::{CommandNode, CommandTree, FlagSet};

pub const DEFAULT_PROGRAM: &str = "gcloud";

/// Which top-level commands the preamble offers when a subset is requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PreambleCommands {
    /// Only the commands that survive subset filtering
    #[default]
    Filtered,
    /// Every top-level command in the tree
    All,
}

#[derive(Clone, Debug)]
pub struct FishGenerator {
    program: String,
}

impl Default for FishGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl FishGenerator {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn preamble(&self, root_commands: &[&str]) -> String {
        let prog = &self.program;
        let root_commands = root_commands.join(" ");
        format!(
            r#"function __{prog}_needs_command
    set -l tokens (commandline -opc)
    set -e tokens[1]
    contains $tokens {root_commands}
    and return 1
    return 0
end

function __{prog}_starts_with
    set -l subcommand $argv
    set -l current_cmd (commandline -opc)
    string match -r -- "^{prog} $subcommand\$" "$current_cmd"
end

complete -c {prog} -f -n __{prog}_needs_command -a '{root_commands}'
"#
        )
    }

    /// Rule statements for the whole tree in pre-order. The root contributes
    /// a flag rule only; every other node contributes a subcommand rule (when
    /// it has children) followed by a flag rule.
    pub fn generate(&self, tree: &CommandTree) -> Vec<String> {
        let mut statements = Vec::new();
        self.visit(tree.root(), &[], tree.root_flags(), &mut statements);
        statements
    }

    /// Preamble followed by the newline-joined rule statements.
    pub fn render(&self, tree: &CommandTree, root_commands: &[&str]) -> String {
        let mut script = self.preamble(root_commands);
        script.push_str(&self.generate(tree).join("\n"));
        script
    }

    fn visit(&self, node: &CommandNode, path: &[&str], root_flags: &FlagSet, statements: &mut Vec<String>) {
        let condition = self.path_condition(path);

        if !path.is_empty() && !node.is_leaf() {
            statements.push(format!(
                "complete -c {} -f -n '{}' -a '{}'",
                self.program,
                condition,
                node.subcommand_names().join(" ")
            ));
        }

        let effective_flags = node.flags.union(root_flags);
        let options = effective_flags
            .iter()
            .map(|flag| format!("-l {}", strip_flag_prefix(flag)))
            .collect::<Vec<_>>()
            .join(" ");
        statements.push(format!("complete -c {} -f -n '{}' {}", self.program, condition, options));

        for (name, child) in &node.commands {
            let mut child_path = path.to_vec();
            child_path.push(name.as_str());
            self.visit(child, &child_path, root_flags, statements);
        }
    }

    fn path_condition(&self, path: &[&str]) -> String {
        format!("__{}_starts_with {}", self.program, path.join(" "))
    }
}

/// `--format` -> `format`. The first two characters are dropped whatever they are.
pub fn strip_flag_prefix(flag: &str) -> &str {
    match flag.char_indices().nth(2) {
        Some((idx, _)) => &flag[idx..],
        None => "",
    }
}
