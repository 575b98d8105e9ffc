use log::warn;
use serde::de::{Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;

/// Child commands in the order the tree document lists them.
pub type Subcommands = Vec<(String, CommandNode)>;

/// An ordered set of flag identifiers (`--account`, `--format`, ...).
///
/// Insertion order is kept so generated output is stable; inserting a flag
/// that is already present is a no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagSet(Vec<String>);

impl FlagSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns `false` if the flag was already present.
    pub fn insert(&mut self, flag: impl Into<String>) -> bool {
        let flag = flag.into();
        if self.contains(&flag) {
            return false;
        }
        self.0.push(flag);
        true
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.0.iter().any(|f| f == flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Set union into a fresh set: `self`'s flags first, then the flags of
    /// `other` not already present. Neither input is modified.
    pub fn union(&self, other: &FlagSet) -> FlagSet {
        let mut merged = self.clone();
        for flag in other.iter() {
            merged.insert(flag);
        }
        merged
    }
}

impl<S: Into<String>> FromIterator<S> for FlagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut flags = FlagSet::new();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

impl<'de> Deserialize<'de> for FlagSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FlagSetVisitor;

        impl<'de> Visitor<'de> for FlagSetVisitor {
            type Value = FlagSet;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a list of flags or a map keyed by flag")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut flags = FlagSet::new();
                while let Some(flag) = seq.next_element::<String>()? {
                    flags.insert(flag);
                }
                Ok(flags)
            }

            // The SDK ships flags as `{"--flag": <completer kind>}`; only the keys matter here.
            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut flags = FlagSet::new();
                while let Some((flag, IgnoredAny)) = map.next_entry::<String, IgnoredAny>()? {
                    flags.insert(flag);
                }
                Ok(flags)
            }
        }

        deserializer.deserialize_any(FlagSetVisitor)
    }
}

/// One command or subcommand of the completed CLI.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CommandNode {
    #[serde(deserialize_with = "deserialize_command_map")]
    pub commands: Subcommands,

    pub flags: FlagSet,
}

impl CommandNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, name: impl Into<String>, node: CommandNode) -> Self {
        self.insert(name, node);
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag);
        self
    }

    /// Adds a child; an existing child with the same name is replaced in place.
    pub fn insert(&mut self, name: impl Into<String>, node: CommandNode) {
        let name = name.into();
        match self.commands.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = node,
            None => self.commands.push((name, node)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandNode> {
        self.commands.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    pub fn subcommand_names(&self) -> Vec<&str> {
        self.commands.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn is_leaf(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.commands.iter().map(|(_, child)| child.node_count()).sum::<usize>()
    }
}

fn deserialize_command_map<'de, D>(deserializer: D) -> Result<Subcommands, D::Error>
where
    D: Deserializer<'de>,
{
    struct CommandMap;

    impl<'de> Visitor<'de> for CommandMap {
        type Value = Subcommands;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of command name to command node")
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut parent = CommandNode::new();
            while let Some((name, node)) = map.next_entry::<String, CommandNode>()? {
                parent.insert(name, node);
            }
            Ok(parent.commands)
        }
    }
    deserializer.deserialize_map(CommandMap)
}

/// The full command tree of a CLI. The root node has no name; its flags are
/// the root flags every command inherits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CommandTree(CommandNode);

impl CommandTree {
    pub fn new(root: CommandNode) -> Self {
        Self(root)
    }

    pub fn root(&self) -> &CommandNode {
        &self.0
    }

    pub fn root_flags(&self) -> &FlagSet {
        &self.0.flags
    }

    pub fn top_level_names(&self) -> Vec<&str> {
        self.0.subcommand_names()
    }

    /// Keeps only the top-level commands named in `subset`, in tree order.
    /// Root flags are carried over untouched.
    pub fn filter_subset(&self, subset: &[String]) -> CommandTree {
        let known = self.top_level_names();
        for name in subset {
            if self.0.get(name).is_none() {
                let suggestions = suggest_similar_commands(name, &known);
                if suggestions.is_empty() {
                    warn!("Unknown command '{}' in subset", name);
                } else {
                    warn!(
                        "Unknown command '{}' in subset; did you mean {}?",
                        name,
                        suggestions.join(", ")
                    );
                }
            }
        }

        let commands = self
            .0
            .commands
            .iter()
            .filter(|(name, _)| subset.iter().any(|wanted| wanted == name))
            .cloned()
            .collect();

        CommandTree(CommandNode {
            commands,
            flags: self.0.flags.clone(),
        })
    }
}

pub fn suggest_similar_commands(unknown: &str, known: &[&str]) -> Vec<String> {
    let mut suggestions: Vec<(&str, usize)> = known
        .iter()
        .map(|name| (*name, levenshtein::levenshtein(unknown, name)))
        .filter(|(_, distance)| *distance <= 3)
        .collect();

    suggestions.sort_by_key(|(_, distance)| *distance);
    suggestions.into_iter().take(3).map(|(name, _)| name.to_string()).collect()
}
