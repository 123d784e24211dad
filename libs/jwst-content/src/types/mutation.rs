use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ContentError, ContentResult};
use crate::constants;

/// Batches produced by one serialize pass, keyed by block path.
pub type MutationBatches = BTreeMap<String, MutationBatch>;

/// Results of executed batches as returned by the storage layer, keyed by block path.
pub type ExecutedMutations = BTreeMap<String, ActionResults>;

/// Related records fetched for a persisted document, keyed by block path.
pub type FetchedRecords = BTreeMap<String, Vec<Value>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationAction {
    Create,
    Connect,
    Disconnect,
}

impl MutationAction {
    pub const ALL: [MutationAction; 3] = [Self::Create, Self::Connect, Self::Disconnect];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
        }
    }
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MutationAction {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "connect" => Ok(Self::Connect),
            "disconnect" => Ok(Self::Disconnect),
            other => Err(ContentError::MalformedMutationPath(other.into())),
        }
    }
}

/// Positional key of one mutation entry: `<path>.<action>[<index>]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MutationPath {
    pub path: String,
    pub action: MutationAction,
    pub index: usize,
}

impl MutationPath {
    pub fn new<S: Into<String>>(path: S, action: MutationAction, index: usize) -> Self {
        Self {
            path: path.into(),
            action,
            index,
        }
    }
}

impl fmt::Display for MutationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}[{}]", self.path, self.action, self.index)
    }
}

impl FromStr for MutationPath {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ContentError::MalformedMutationPath(s.into());

        let (head, index) = s
            .strip_suffix(']')
            .and_then(|rest| rest.rsplit_once('['))
            .ok_or_else(malformed)?;
        let index = index.parse::<usize>().map_err(|_| malformed())?;
        let (path, action) = head.rsplit_once('.').ok_or_else(malformed)?;
        if path.is_empty() {
            return Err(malformed());
        }
        let action = action.parse().map_err(|_| malformed())?;

        Ok(Self::new(path, action, index))
    }
}

/// Mutations a block handler emits for one node, in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mutations {
    entries: Vec<(MutationAction, Vec<Value>)>,
}

impl Mutations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [Mutations::push].
    pub fn with(mut self, action: MutationAction, value: Value) -> Self {
        self.push(action, value);
        self
    }

    /// Append a single entry, or every element when `value` is an array.
    pub fn push(&mut self, action: MutationAction, value: Value) {
        let entries = match value {
            Value::Array(items) => items,
            single => vec![single],
        };
        self.entries.push((action, entries));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, entries)| entries.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, entries)| entries.len()).sum()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (MutationAction, Value)> {
        self.entries
            .into_iter()
            .flat_map(|(action, entries)| entries.into_iter().map(move |entry| (action, entry)))
    }
}

/// All operations to run against one related collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationBatch {
    /// Always set: every save replaces the full related set.
    pub disconnect_all: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub create: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connect: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disconnect: Vec<Value>,
}

impl Default for MutationBatch {
    fn default() -> Self {
        Self {
            disconnect_all: true,
            create: vec![],
            connect: vec![],
            disconnect: vec![],
        }
    }
}

impl MutationBatch {
    pub fn entries(&self, action: MutationAction) -> &[Value] {
        match action {
            MutationAction::Create => &self.create,
            MutationAction::Connect => &self.connect,
            MutationAction::Disconnect => &self.disconnect,
        }
    }

    fn entries_mut(&mut self, action: MutationAction) -> &mut Vec<Value> {
        match action {
            MutationAction::Create => &mut self.create,
            MutationAction::Connect => &mut self.connect,
            MutationAction::Disconnect => &mut self.disconnect,
        }
    }

    /// Append an entry and return its index within the action's list.
    pub fn append(&mut self, action: MutationAction, entry: Value) -> usize {
        let entries = self.entries_mut(action);
        entries.push(entry);
        entries.len() - 1
    }
}

/// Executed results of one batch, positional per action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResults {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub create: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connect: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disconnect: Vec<Value>,
}

impl ActionResults {
    pub fn entries(&self, action: MutationAction) -> &[Value] {
        match action {
            MutationAction::Create => &self.create,
            MutationAction::Connect => &self.connect,
            MutationAction::Disconnect => &self.disconnect,
        }
    }

    pub fn entries_mut(&mut self, action: MutationAction) -> &mut Vec<Value> {
        match action {
            MutationAction::Create => &mut self.create,
            MutationAction::Connect => &mut self.connect,
            MutationAction::Disconnect => &mut self.disconnect,
        }
    }
}

/// Look a mutation path up in a set of executed results.
pub fn lookup<'a>(results: &'a ExecutedMutations, path: &MutationPath) -> Option<&'a Value> {
    results
        .get(&path.path)
        .and_then(|r| r.entries(path.action).get(path.index))
}

/// Identifier carried by a result entry: its `id` for objects, or the entry
/// itself for strings and numbers. Falsy values yield nothing.
pub fn join_id(result: &Value) -> Option<Value> {
    let id = match result {
        Value::Object(map) => map.get(constants::ID)?,
        other => other,
    };
    match id {
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(_) | Value::Number(_) => Some(id.clone()),
        _ => None,
    }
}

pub(crate) fn parse_paths(paths: &[&str]) -> ContentResult<Vec<MutationPath>> {
    paths.iter().map(|p| p.parse()).collect()
}
