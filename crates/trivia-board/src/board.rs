//! The question board: categories as columns, questions as point-valued cells.
//!
//! The [`Board`] owns every [`Category`] of a session and the per-question
//! answered flags. `(category name, point value)` is the join key used both
//! during play and by report reconstruction, so the constructor rejects any
//! board on which that pair would be ambiguous.

use trivia_types::{Category, Question};
use tracing::debug;

use crate::error::BoardError;

/// The full set of categories and questions for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Board {
    /// Categories in first-seen order.
    categories: Vec<Category>,
}

impl Board {
    /// Create a board with no categories. An empty board is complete.
    pub const fn empty() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Build a board from categories, merging any that share a name.
    ///
    /// Merged categories keep the position of their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::EmptyCategoryName`] for a blank category name,
    /// or [`BoardError::Model`] when merging would duplicate a point value
    /// within a category.
    pub fn new(categories: Vec<Category>) -> Result<Self, BoardError> {
        let mut board = Self::empty();
        for category in categories {
            board.insert_category(category)?;
        }
        debug!(
            categories = board.categories.len(),
            questions = board.question_count(),
            "board assembled"
        );
        Ok(board)
    }

    fn insert_category(&mut self, category: Category) -> Result<(), BoardError> {
        if category.name().trim().is_empty() {
            return Err(BoardError::EmptyCategoryName);
        }
        match self.category_mut(category.name()) {
            Some(existing) => existing.merge(category)?,
            None => self.categories.push(category),
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// All categories in board order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by exact name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name() == name)
    }

    fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.name() == name)
    }

    /// Resolve `(category, points)` to its question. Absence is not an error
    /// here; callers decide what a missing question means.
    pub fn find_question(&self, category: &str, points: u32) -> Option<&Question> {
        self.category(category)?.question(points)
    }

    /// Categories that still have at least one unanswered question.
    pub fn categories_with_remaining_questions(&self) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| c.has_remaining())
            .collect()
    }

    /// True iff every question on the board has been answered.
    pub fn all_answered(&self) -> bool {
        self.categories.iter().all(|c| !c.has_remaining())
    }

    /// Total number of questions on the board.
    pub fn question_count(&self) -> usize {
        self.categories.iter().map(|c| c.questions().len()).sum()
    }

    /// Number of questions already answered.
    pub fn answered_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(Category::questions)
            .filter(|q| q.is_answered())
            .count()
    }

    // -------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------

    /// Mark the `(category, points)` question as answered.
    ///
    /// The flag can only go from unanswered to answered. Marking an already
    /// answered question fails with [`BoardError::AlreadyAnswered`] and
    /// leaves the board untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CategoryNotFound`],
    /// [`BoardError::QuestionNotFound`], or [`BoardError::AlreadyAnswered`].
    pub fn mark_answered(&mut self, category: &str, points: u32) -> Result<(), BoardError> {
        let cat = self
            .category_mut(category)
            .ok_or_else(|| BoardError::CategoryNotFound(category.to_owned()))?;
        let question = cat
            .question_mut(points)
            .ok_or_else(|| BoardError::QuestionNotFound {
                category: category.to_owned(),
                points,
            })?;

        if question.mark_answered() {
            Ok(())
        } else {
            Err(BoardError::AlreadyAnswered {
                category: category.to_owned(),
                points,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use trivia_types::ModelError;

    use super::*;

    fn question(text: &str, points: u32) -> Question {
        let options: BTreeMap<String, String> = [("A", "yes"), ("B", "no")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Question::new(text, points, options, "A").unwrap()
    }

    fn category(name: &str, points: &[u32]) -> Category {
        let mut category = Category::new(name);
        for &p in points {
            assert!(category.add_question(question(&format!("{name} {p}"), p)).is_ok());
        }
        category
    }

    fn sample_board() -> Board {
        let board = Board::new(vec![
            category("General", &[100, 200]),
            category("Science", &[100]),
        ]);
        board.unwrap()
    }

    #[test]
    fn empty_board_is_complete() {
        let board = Board::empty();
        assert!(board.all_answered());
        assert!(board.categories_with_remaining_questions().is_empty());
        assert_eq!(board.question_count(), 0);
    }

    #[test]
    fn find_question_by_category_and_points() {
        let board = sample_board();
        assert_eq!(
            board.find_question("General", 200).map(Question::text),
            Some("General 200")
        );
        assert!(board.find_question("General", 300).is_none());
        assert!(board.find_question("History", 100).is_none());
    }

    #[test]
    fn duplicate_category_names_are_merged() {
        let board = Board::new(vec![
            category("General", &[100]),
            category("Science", &[100]),
            category("General", &[200]),
        ]);
        let board = board.unwrap();

        assert_eq!(board.categories().len(), 2);
        assert_eq!(board.categories().first().map(Category::name), Some("General"));
        assert_eq!(board.category("General").map(|c| c.questions().len()), Some(2));
    }

    #[test]
    fn merge_rejects_duplicate_point_value() {
        let board = Board::new(vec![category("General", &[100]), category("General", &[100])]);
        assert!(matches!(
            board,
            Err(BoardError::Model(ModelError::DuplicatePointValue { points: 100, .. }))
        ));
    }

    #[test]
    fn blank_category_name_is_rejected() {
        let board = Board::new(vec![category("  ", &[100])]);
        assert_eq!(board, Err(BoardError::EmptyCategoryName));
    }

    #[test]
    fn mark_answered_is_one_way() {
        let mut board = sample_board();
        assert_eq!(board.answered_count(), 0);

        assert!(board.mark_answered("General", 100).is_ok());
        assert_eq!(board.answered_count(), 1);
        assert_eq!(
            board.mark_answered("General", 100),
            Err(BoardError::AlreadyAnswered {
                category: "General".to_owned(),
                points: 100,
            })
        );
        assert_eq!(board.answered_count(), 1);
        assert!(board.find_question("General", 100).is_some_and(Question::is_answered));
    }

    #[test]
    fn mark_answered_reports_missing_targets() {
        let mut board = sample_board();
        assert_eq!(
            board.mark_answered("History", 100),
            Err(BoardError::CategoryNotFound("History".to_owned()))
        );
        assert!(matches!(
            board.mark_answered("Science", 500),
            Err(BoardError::QuestionNotFound { points: 500, .. })
        ));
    }

    #[test]
    fn remaining_categories_shrink_until_complete() {
        let mut board = sample_board();
        assert_eq!(board.categories_with_remaining_questions().len(), 2);

        assert!(board.mark_answered("Science", 100).is_ok());
        let remaining: Vec<&str> = board
            .categories_with_remaining_questions()
            .into_iter()
            .map(Category::name)
            .collect();
        assert_eq!(remaining, vec!["General"]);
        assert!(!board.all_answered());

        assert!(board.mark_answered("General", 100).is_ok());
        assert!(board.mark_answered("General", 200).is_ok());
        assert!(board.all_answered());
        assert!(board.categories_with_remaining_questions().is_empty());
    }
}
