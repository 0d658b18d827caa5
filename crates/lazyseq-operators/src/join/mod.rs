//! Relational operators over two inputs joined on equal keys.
//!
//! Both build a key table from the right input on the first pull (groups in
//! right encounter order) and then stream the left. `join` emits one row per
//! matching pair; `group_join` emits exactly one row per left element. Cross
//! joins need no keys and are expressed with `select_many_with`.

mod group;
mod hash;
