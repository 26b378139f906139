//! Unique rule names within one mailbox.
//!
//! Zimbra identifies filter rules by name, and Ingo happily stores several
//! rules called "spam". The second one becomes "spam 2", the third "spam 3".

use std::collections::{HashMap, HashSet};

/// Allocates rule names for one mailbox. Create one per conversion.
#[derive(Debug, Default)]
pub struct UniqueNameAllocator {
    /// Every name handed out so far.
    taken: HashSet<String>,
    /// Next suffix to try for each base name.
    next_suffix: HashMap<String, usize>,
}

impl UniqueNameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a name not yet handed out by this allocator.
    ///
    /// `raw_name` should already be in its rendered form, so uniqueness is
    /// decided on the text that ends up in the script. A trailing odd run of
    /// backslashes gets one more backslash so the closing quote of the
    /// rendered name is not escaped.
    pub fn allocate(&mut self, raw_name: &str) -> String {
        let mut name = raw_name.to_string();
        let trailing = name.chars().rev().take_while(|&c| c == '\\').count();
        if trailing % 2 == 1 {
            name.push('\\');
        }

        let allocated = if self.taken.contains(&name) {
            let suffix = self.next_suffix.entry(name.clone()).or_insert(2);
            let mut candidate = format!("{name} {suffix}");
            while self.taken.contains(&candidate) {
                *suffix += 1;
                candidate = format!("{name} {suffix}");
            }
            *suffix += 1;
            candidate
        } else {
            name
        };

        self.taken.insert(allocated.clone());
        allocated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_unchanged() {
        let mut names = UniqueNameAllocator::new();
        assert_eq!(names.allocate("spam"), "spam");
        assert_eq!(names.allocate("lists"), "lists");
    }

    #[test]
    fn test_duplicates_are_numbered() {
        let mut names = UniqueNameAllocator::new();
        let allocated: Vec<String> = (0..4).map(|_| names.allocate("spam")).collect();
        assert_eq!(allocated, vec!["spam", "spam 2", "spam 3", "spam 4"]);
    }

    #[test]
    fn test_trailing_backslash_is_doubled() {
        let mut names = UniqueNameAllocator::new();
        assert_eq!(names.allocate("folder\\"), "folder\\\\");
        assert_eq!(names.allocate("folder\\"), "folder\\\\ 2");
        // Already even: untouched, and shares the counter with the doubled form.
        assert_eq!(names.allocate("folder\\\\"), "folder\\\\ 3");
    }

    #[test]
    fn test_suffixed_names_are_reserved() {
        let mut names = UniqueNameAllocator::new();
        assert_eq!(names.allocate("spam"), "spam");
        assert_eq!(names.allocate("spam"), "spam 2");
        assert_eq!(names.allocate("spam 2"), "spam 2 2");
        assert_eq!(names.allocate("spam"), "spam 3");
    }

    #[test]
    fn test_literal_name_blocks_suffix() {
        let mut names = UniqueNameAllocator::new();
        assert_eq!(names.allocate("spam 2"), "spam 2");
        assert_eq!(names.allocate("spam"), "spam");
        assert_eq!(names.allocate("spam"), "spam 3");
        assert_eq!(names.allocate("spam"), "spam 4");
    }

    #[test]
    fn test_allocators_are_independent() {
        let mut first = UniqueNameAllocator::new();
        let mut second = UniqueNameAllocator::new();
        assert_eq!(first.allocate("a"), "a");
        assert_eq!(first.allocate("a"), "a 2");
        assert_eq!(second.allocate("a"), "a");
    }
}
