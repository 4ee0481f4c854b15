pub mod checklist;
pub mod roster;
