use crate::error::ValidationError;
use crate::ids::{ItemId, PhraseId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrangementItem {
    pub id: ItemId,
    pub phrase_id: PhraseId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Earlier,
    Later,
}

/// The track laid out as a list of phrase references. A phrase can appear
/// any number of times; each appearance is its own item.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arrangement {
    items: Vec<ArrangementItem>,
}

impl Arrangement {
    pub fn items(&self) -> &[ArrangementItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn append(&mut self, phrase_id: PhraseId) -> ItemId {
        let id = ItemId::next();
        self.items.push(ArrangementItem { id, phrase_id });
        id
    }

    pub fn remove(&mut self, id: ItemId) -> Result<ArrangementItem, ValidationError> {
        let idx = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(ValidationError::UnknownItem(id))?;
        Ok(self.items.remove(idx))
    }

    /// Swaps the item at `index` with its neighbour. Moving past either end
    /// does nothing and returns false.
    pub fn move_item(&mut self, index: usize, dir: Direction) -> bool {
        let target = match dir {
            Direction::Earlier => index.checked_sub(1),
            Direction::Later => index.checked_add(1),
        };
        match target {
            Some(j) if index < self.items.len() && j < self.items.len() => {
                self.items.swap(index, j);
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrase_ids(arr: &Arrangement) -> Vec<PhraseId> {
        arr.items().iter().map(|i| i.phrase_id).collect()
    }

    #[test]
    fn append_allows_repeats() {
        let verse = PhraseId::next();
        let mut arr = Arrangement::default();
        let a = arr.append(verse);
        let b = arr.append(verse);
        assert_ne!(a, b);
        assert_eq!(phrase_ids(&arr), vec![verse, verse]);
    }

    #[test]
    fn moves_swap_neighbours() {
        let (a, b, c) = (PhraseId::next(), PhraseId::next(), PhraseId::next());
        let mut arr = Arrangement::default();
        for p in [a, b, c] {
            arr.append(p);
        }
        assert!(arr.move_item(0, Direction::Later));
        assert_eq!(phrase_ids(&arr), vec![b, a, c]);
        assert!(arr.move_item(2, Direction::Earlier));
        assert_eq!(phrase_ids(&arr), vec![b, c, a]);
    }

    #[test]
    fn moves_past_the_ends_are_no_ops() {
        let (a, b) = (PhraseId::next(), PhraseId::next());
        let mut arr = Arrangement::default();
        arr.append(a);
        arr.append(b);
        let before = arr.clone();
        assert!(!arr.move_item(0, Direction::Earlier));
        assert!(!arr.move_item(1, Direction::Later));
        assert!(!arr.move_item(7, Direction::Earlier));
        assert!(!arr.move_item(usize::MAX, Direction::Later));
        assert_eq!(arr, before);
    }

    #[test]
    fn remove_and_clear() {
        let p = PhraseId::next();
        let mut arr = Arrangement::default();
        let first = arr.append(p);
        arr.append(p);
        assert_eq!(arr.remove(first).unwrap().id, first);
        assert_eq!(arr.remove(first), Err(ValidationError::UnknownItem(first)));
        assert_eq!(arr.len(), 1);
        arr.clear();
        assert!(arr.is_empty());
    }
}
