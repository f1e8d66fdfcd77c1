//! Catalog aggregate - The full course/level tree plus derived progression flags
//!
//! # Storage
//!
//! Courses own their levels in an ordered `Vec`; the position of a level in
//! its course is the unlock chain. A flat index from `LevelId` to
//! `(course, level)` positions gives O(1) lookups without walking the tree.
//!
//! # Mutation
//!
//! Content never changes after load. The progression attributes of each
//! level (`unlocked`, `completed`, `current_stage`) only change through the
//! reducer methods below, each of which returns an outcome describing what
//! happened. Callers that share the catalog hold it in an `Arc` and mutate a
//! copy-on-write clone, so a reader's snapshot is never edited underneath it.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entities::{Course, Level};
use crate::error::DomainError;
use crate::events::{LevelCompletion, StageChanged};
use crate::value_objects::Stage;
use crate::{CourseId, LevelId};

/// Position of a level inside the catalog tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPosition {
    pub course_index: usize,
    pub level_index: usize,
}

/// The mutable progression attributes of one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LevelState {
    pub unlocked: bool,
    pub completed: bool,
    pub current_stage: Stage,
}

/// The static course/level tree with its derived progression flags.
///
/// # Invariants
///
/// - Level ids are unique across all courses
/// - Every level's `course_id` names its owning course
/// - The first level of every course is unlocked
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    courses: Vec<Course>,
    index: HashMap<LevelId, LevelPosition>,
}

impl Catalog {
    /// Build a catalog, validating ownership and initializing unlock flags.
    ///
    /// Stored `completed`/`current_stage` values are kept; `unlocked` is
    /// recomputed from the completion chain.
    pub fn new(courses: Vec<Course>) -> Result<Self, DomainError> {
        let mut index = HashMap::new();
        let mut course_ids = HashSet::new();

        for (course_index, course) in courses.iter().enumerate() {
            if course.id.as_str().trim().is_empty() {
                return Err(DomainError::validation("Course id cannot be empty"));
            }
            if !course_ids.insert(course.id.clone()) {
                return Err(DomainError::validation(format!(
                    "Duplicate course id: {}",
                    course.id
                )));
            }

            for (level_index, level) in course.levels.iter().enumerate() {
                if level.course_id != course.id {
                    return Err(DomainError::validation(format!(
                        "Level {} declares course {} but belongs to {}",
                        level.id, level.course_id, course.id
                    )));
                }
                let position = LevelPosition {
                    course_index,
                    level_index,
                };
                if index.insert(level.id.clone(), position).is_some() {
                    return Err(DomainError::validation(format!(
                        "Duplicate level id: {}",
                        level.id
                    )));
                }
            }
        }

        let mut catalog = Self { courses, index };
        for course in &mut catalog.courses {
            recompute_unlocks(course);
        }
        Ok(catalog)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, course_id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| &course.id == course_id)
    }

    pub fn position(&self, level_id: &LevelId) -> Option<LevelPosition> {
        self.index.get(level_id).copied()
    }

    pub fn level(&self, level_id: &LevelId) -> Option<&Level> {
        let position = self.position(level_id)?;
        self.courses
            .get(position.course_index)?
            .levels
            .get(position.level_index)
    }

    /// The course that owns `level_id`.
    pub fn course_of(&self, level_id: &LevelId) -> Option<&Course> {
        let position = self.position(level_id)?;
        self.courses.get(position.course_index)
    }

    pub fn contains(&self, level_id: &LevelId) -> bool {
        self.index.contains_key(level_id)
    }

    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.courses.iter().flat_map(|course| course.levels.iter())
    }

    pub fn level_count(&self) -> usize {
        self.index.len()
    }

    /// Progression attributes of every level, for persistence.
    pub fn level_states(&self) -> Vec<(LevelId, LevelState)> {
        self.levels()
            .map(|level| {
                (
                    level.id.clone(),
                    LevelState {
                        unlocked: level.unlocked,
                        completed: level.completed,
                        current_stage: level.current_stage,
                    },
                )
            })
            .collect()
    }

    // =========================================================================
    // Reducers
    // =========================================================================

    /// Set a level's current stage without validation.
    ///
    /// Transition rules live in [`validate_transition`](crate::value_objects::validate_transition);
    /// callers validate first and then apply.
    pub fn set_stage(&mut self, level_id: &LevelId, stage: Stage) -> Option<StageChanged> {
        let level = self.level_mut(level_id)?;
        let from = level.current_stage;
        level.current_stage = stage;
        Some(StageChanged {
            level_id: level_id.clone(),
            from,
            to: stage,
        })
    }

    /// Mark a level completed and unlock the level immediately after it.
    ///
    /// Only the next level of the same course is touched.
    pub fn mark_completed(&mut self, level_id: &LevelId) -> Option<LevelCompletion> {
        let position = self.position(level_id)?;
        let course = self.courses.get_mut(position.course_index)?;

        let level = course.levels.get_mut(position.level_index)?;
        level.completed = true;

        let unlocked_next = match course.levels.get_mut(position.level_index + 1) {
            Some(next) if !next.unlocked => {
                next.unlocked = true;
                Some(next.id.clone())
            }
            _ => None,
        };

        Some(LevelCompletion {
            level_id: level_id.clone(),
            course_id: course.id.clone(),
            unlocked_next,
            course_completed: course.is_completed(),
        })
    }

    /// Replace every level's `completed`/`unlocked` flags with the view
    /// implied by `completed_levels`.
    ///
    /// This is a full recomputation, not a merge: local flags that the set
    /// does not support are cleared. Stages are left alone.
    pub fn overlay_completed(&mut self, completed_levels: &HashSet<LevelId>) {
        for course in &mut self.courses {
            for level in &mut course.levels {
                level.completed = completed_levels.contains(&level.id);
            }
            recompute_unlocks(course);
        }
    }

    /// Restore persisted progression attributes. Returns `false` for ids
    /// the catalog no longer contains.
    pub fn apply_level_state(&mut self, level_id: &LevelId, state: LevelState) -> bool {
        match self.level_mut(level_id) {
            Some(level) => {
                level.unlocked = state.unlocked;
                level.completed = state.completed;
                level.current_stage = state.current_stage;
                true
            }
            None => false,
        }
    }

    fn level_mut(&mut self, level_id: &LevelId) -> Option<&mut Level> {
        let position = self.position(level_id)?;
        self.courses
            .get_mut(position.course_index)?
            .levels
            .get_mut(position.level_index)
    }
}

/// Level `i` is unlocked iff `i == 0` or level `i - 1` is completed.
fn recompute_unlocks(course: &mut Course) {
    let mut previous_completed = true;
    for level in &mut course.levels {
        level.unlocked = previous_completed;
        previous_completed = level.completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Badge;

    fn course(id: &str, levels: usize) -> Course {
        (1..=levels).fold(Course::new(id, id.to_uppercase()), |course, n| {
            course.with_level(Level::new(format!("{id}-{n}"), id, format!("Level {n}")))
        })
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![course("dsa", 3), course("web", 2)]).expect("valid catalog")
    }

    fn unlocked(catalog: &Catalog, id: &str) -> bool {
        catalog.level(&LevelId::from(id)).map(Level::unlocked) == Some(true)
    }

    #[test]
    fn first_level_of_each_course_starts_unlocked() {
        let catalog = catalog();
        assert!(unlocked(&catalog, "dsa-1"));
        assert!(!unlocked(&catalog, "dsa-2"));
        assert!(unlocked(&catalog, "web-1"));
        assert!(!unlocked(&catalog, "web-2"));
    }

    #[test]
    fn rejects_duplicate_level_ids() {
        let mut web = course("web", 1);
        web.levels.push(Level::new("dsa-1", "web", "Imposter"));
        let err = Catalog::new(vec![course("dsa", 1), web]).expect_err("duplicate");
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("dsa-1")));
    }

    #[test]
    fn rejects_level_with_foreign_course_id() {
        let bad = Course::new("dsa", "DSA").with_level(Level::new("dsa-1", "web", "Arrays"));
        assert!(Catalog::new(vec![bad]).is_err());
    }

    #[test]
    fn lookup_by_id_uses_index() {
        let catalog = catalog();
        assert_eq!(
            catalog.position(&"web-2".into()),
            Some(LevelPosition {
                course_index: 1,
                level_index: 1
            })
        );
        assert_eq!(catalog.level_count(), 5);
        assert!(catalog.level(&"nope".into()).is_none());
    }

    #[test]
    fn mark_completed_unlocks_only_the_next_level() {
        let mut catalog = catalog();
        let completion = catalog
            .mark_completed(&"dsa-1".into())
            .expect("level exists");

        assert_eq!(completion.unlocked_next, Some(LevelId::from("dsa-2")));
        assert!(!completion.course_completed);
        assert!(unlocked(&catalog, "dsa-2"));
        assert!(!unlocked(&catalog, "dsa-3"));
        assert!(!unlocked(&catalog, "web-2"));
    }

    #[test]
    fn completing_last_level_reports_course_completion() {
        let mut catalog = Catalog::new(vec![
            course("dsa", 2).with_completion_badge(Badge::new("dsa-master", "DSA Master"))
        ])
        .expect("valid");
        catalog.mark_completed(&"dsa-1".into());
        let completion = catalog.mark_completed(&"dsa-2".into()).expect("exists");

        assert_eq!(completion.unlocked_next, None);
        assert!(completion.course_completed);
    }

    #[test]
    fn overlay_recomputes_flags_from_remote_set() {
        let mut catalog = catalog();
        catalog.mark_completed(&"dsa-1".into());
        catalog.mark_completed(&"dsa-2".into());

        let remote: HashSet<LevelId> = ["web-1".into()].into_iter().collect();
        catalog.overlay_completed(&remote);

        let dsa_1 = catalog.level(&"dsa-1".into()).expect("exists");
        assert!(!dsa_1.completed());
        assert!(dsa_1.unlocked());
        assert!(!unlocked(&catalog, "dsa-2"));
        assert!(unlocked(&catalog, "web-2"));
    }

    #[test]
    fn set_stage_reports_previous_stage() {
        let mut catalog = catalog();
        let change = catalog
            .set_stage(&"dsa-1".into(), Stage::AiVideos)
            .expect("exists");
        assert_eq!(change.from, Stage::Narrative);
        assert_eq!(change.to, Stage::AiVideos);
        assert!(catalog.set_stage(&"nope".into(), Stage::AiVideos).is_none());
    }

    #[test]
    fn level_states_round_trip_through_apply() {
        let mut source = catalog();
        source.mark_completed(&"dsa-1".into());
        source.set_stage(&"dsa-2".into(), Stage::Assessment);

        let mut target = catalog();
        for (id, state) in source.level_states() {
            assert!(target.apply_level_state(&id, state));
        }
        assert_eq!(target, source);
        assert!(!target.apply_level_state(&"gone".into(), LevelState::default()));
    }
}
