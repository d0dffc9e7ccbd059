//! DAG nodes and their persisted record format.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use vrds_core::{hash, Element};

/// One node of the hash DAG.
///
/// The id commits to the predecessor *sequence*: the same predecessors in a
/// different order give a different update.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Update {
    pub group_id: Element,
    pub content: Element,
    pub depth: u64,
    pub predecessors: Vec<Element>,
}

impl Update {
    pub fn new(group_id: Element, content: Element, depth: u64, predecessors: Vec<Element>) -> Self {
        Update {
            group_id,
            content,
            depth,
            predecessors,
        }
    }

    /// A root of a new group: depth 0, group id derived from the content.
    pub fn root(content: Element) -> Self {
        Update::new(group_id_for(content), content, 0, Vec::new())
    }

    /// `hash(group_id, content, depth, |predecessors|, predecessors...)`
    pub fn id(&self) -> Element {
        let mut input = Vec::with_capacity(4 + self.predecessors.len());
        input.push(self.group_id);
        input.push(self.content);
        input.push(Element::from_u64(self.depth));
        input.push(Element::from_u64(self.predecessors.len() as u64));
        input.extend_from_slice(&self.predecessors);
        hash(&input)
    }

    pub fn is_root(&self) -> bool {
        self.predecessors.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a persisted record, migrating older layouts.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: UpdateRecord = serde_json::from_str(json)?;
        Ok(record.migrate())
    }
}

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.content.to_text().unwrap_or_else(|_| self.content.short());
        let predecessors: Vec<String> = self.predecessors.iter().map(Element::short).collect();
        write!(
            f,
            "Update {{group_id={} text='{}', depth={}, predecessors=[{}], id={}}}",
            self.group_id.short(),
            text,
            self.depth,
            predecessors.join(","),
            self.id().short()
        )
    }
}

/// Group id of a root whose content is `content`.
pub fn group_id_for(content: Element) -> Element {
    hash(&[content])
}

/// Depth a new update on top of `depths` must carry. `None` if the deepest
/// predecessor already sits at `u64::MAX`.
pub fn next_depth(depths: impl IntoIterator<Item = u64>) -> Option<u64> {
    match depths.into_iter().max() {
        None => Some(0),
        Some(max) => max.checked_add(1),
    }
}

/// Earlier record layout that named the group `room_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyUpdate {
    pub room_id: Element,
    pub content: Element,
    pub depth: u64,
    pub predecessors: Vec<Element>,
}

/// Every record layout that has been persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpdateRecord {
    Current(Update),
    Legacy(LegacyUpdate),
}

impl UpdateRecord {
    pub fn migrate(self) -> Update {
        match self {
            UpdateRecord::Current(update) => update,
            UpdateRecord::Legacy(legacy) => Update {
                group_id: legacy.room_id,
                content: legacy.content,
                depth: legacy.depth,
                predecessors: legacy.predecessors,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn e(v: u64) -> Element {
        Element::from_u64(v)
    }

    #[test]
    fn test_id_layout() {
        assert_eq!(Update::new(e(0), e(1), 2, vec![]).id(), hash(&[e(0), e(1), e(2), e(0)]));
        assert_eq!(
            Update::new(e(0), e(1), 2, vec![e(3)]).id(),
            hash(&[e(0), e(1), e(2), e(1), e(3)])
        );
        assert_eq!(
            Update::new(e(0), e(1), 2, vec![e(3), e(4)]).id(),
            hash(&[e(0), e(1), e(2), e(2), e(3), e(4)])
        );
    }

    #[test]
    fn test_predecessor_order_changes_id() {
        let a = Update::new(e(0), e(1), 2, vec![e(3), e(4)]);
        let b = Update::new(e(0), e(1), 2, vec![e(4), e(3)]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_root() {
        let root = Update::root(e(9));
        assert!(root.is_root());
        assert_eq!(root.depth, 0);
        assert_eq!(root.group_id, group_id_for(e(9)));
    }

    #[test]
    fn test_next_depth() {
        assert_eq!(next_depth(Vec::<u64>::new()), Some(0));
        assert_eq!(next_depth([0]), Some(1));
        assert_eq!(next_depth([2, 5, 1]), Some(6));
        assert_eq!(next_depth([3, u64::MAX]), None);
    }

    #[test]
    fn test_json_shape() {
        let update = Update::new(e(1), e(2), 3, vec![e(4)]);
        let value: serde_json::Value = serde_json::from_str(&update.to_json().unwrap()).unwrap();
        assert_eq!(value["group_id"], e(1).to_hex());
        assert_eq!(value["depth"], 3);
        assert_eq!(value["predecessors"][0], e(4).to_hex());
        assert_eq!(Update::from_json(&update.to_json().unwrap()).unwrap(), update);
    }

    #[test]
    fn test_legacy_room_id_migrates() {
        let json = format!(
            r#"{{"room_id":"{}","content":"{}","depth":1,"predecessors":["{}"]}}"#,
            e(7).to_hex(),
            e(8).to_hex(),
            e(9).to_hex()
        );
        let update = Update::from_json(&json).unwrap();
        assert_eq!(update, Update::new(e(7), e(8), 1, vec![e(9)]));
    }

    proptest! {
        #[test]
        fn legacy_and_current_records_agree(
            group in any::<u64>(),
            depth in 0u64..1000,
            preds in prop::collection::vec(any::<u64>(), 0..5)
        ) {
            let update = Update::new(e(group), e(7), depth, preds.into_iter().map(e).collect());
            let legacy = LegacyUpdate {
                room_id: update.group_id,
                content: update.content,
                depth: update.depth,
                predecessors: update.predecessors.clone(),
            };
            let json = serde_json::to_string(&legacy).unwrap();
            let migrated = Update::from_json(&json).unwrap();
            prop_assert_eq!(migrated.id(), update.id());
            prop_assert_eq!(Update::from_json(&update.to_json().unwrap()).unwrap(), update);
        }
    }

    #[test]
    fn test_malformed_record() {
        assert!(Update::from_json(r#"{"content":"00"}"#).is_err());
        assert!(Update::from_json("[]").is_err());
    }
}
