//! Security Requirement Collector.

use cks_core::types::ChecklistItem;
use std::collections::HashMap;

/// Items whose toggle is on, in the checklist's declared order.
///
/// The order comes from [`ChecklistItem::ALL`], not from the map or from
/// toggling order. Absent entries count as off. Infallible.
pub fn checked_items(toggles: &HashMap<ChecklistItem, bool>) -> Vec<ChecklistItem> {
    ChecklistItem::ALL
        .into_iter()
        .filter(|item| toggles.get(item).copied().unwrap_or(false))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_map_yields_nothing() {
        assert!(checked_items(&HashMap::new()).is_empty());
    }

    #[test]
    fn test_only_enabled_items_are_returned() {
        let mut toggles = HashMap::new();
        toggles.insert(ChecklistItem::IamLeastPrivilege, true);
        toggles.insert(ChecklistItem::Waf, false);
        let checked = checked_items(&toggles);
        assert_eq!(checked, vec![ChecklistItem::IamLeastPrivilege]);
    }

    #[test]
    fn test_order_follows_declaration_not_toggle_order() {
        let mut toggles = HashMap::new();
        // Toggled in reverse of the declared order.
        toggles.insert(ChecklistItem::CloudWatchLogs, true);
        toggles.insert(ChecklistItem::Waf, true);
        toggles.insert(ChecklistItem::Vpc, true);
        let checked = checked_items(&toggles);
        assert_eq!(
            checked,
            vec![
                ChecklistItem::Vpc,
                ChecklistItem::Waf,
                ChecklistItem::CloudWatchLogs,
            ]
        );
    }

    #[test]
    fn test_explicit_false_behaves_like_absent() {
        let mut toggles = HashMap::new();
        for item in ChecklistItem::ALL {
            toggles.insert(item, false);
        }
        assert!(checked_items(&toggles).is_empty());
    }
}
