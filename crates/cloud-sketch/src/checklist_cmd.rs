//! `cks checklist`: print the fixed security checklist.

use cks_core::types::ChecklistItem;

pub fn print_checklist() {
    println!("Security checklist (toggle with /check <key> inside a session):");
    for item in ChecklistItem::ALL {
        println!("  {:16} {}", item.key(), item.label());
    }
}
