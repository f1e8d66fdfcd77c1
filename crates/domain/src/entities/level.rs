//! Level entity - One playable unit inside a course
//!
//! Content fields are read-only catalog data. The progression attributes
//! (`unlocked`, `completed`, `current_stage`) are owned by the
//! [`Catalog`](crate::aggregates::Catalog) and only change through its
//! reducers, so they are exposed read-only here.

use serde::{Deserialize, Serialize};

use crate::value_objects::{GameConfig, GamePlacement, Stage};
use crate::{CourseId, LevelId};

/// A multiple-choice assessment question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_answer
    }
}

/// A hands-on coding exercise attached to a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingProblem {
    pub title: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starter_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    #[default]
    Article,
    Video,
    Documentation,
    Practice,
}

/// External reading shown in the `resources` stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalResource {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub kind: ResourceKind,
}

/// A level - owned by exactly one course.
///
/// # Invariants
///
/// - `course_id` names the course whose `levels` contains this level
/// - `completed == true` only after the level exited through `complete`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: LevelId,
    pub course_id: CourseId,
    pub title: String,
    #[serde(default)]
    pub xp_reward: u32,

    // Content
    #[serde(default)]
    pub narrative: String,
    #[serde(default)]
    pub teaching_content: String,
    #[serde(default)]
    pub video_urls: Vec<String>,
    #[serde(default)]
    pub quiz_questions: Vec<QuizQuestion>,
    #[serde(default)]
    pub coding_problems: Vec<CodingProblem>,
    #[serde(default)]
    pub external_resources: Vec<ExternalResource>,
    #[serde(default)]
    pub game_config: Option<GameConfig>,

    // Progression (owned by the catalog)
    #[serde(default)]
    pub(crate) unlocked: bool,
    #[serde(default)]
    pub(crate) completed: bool,
    #[serde(default)]
    pub(crate) current_stage: Stage,
}

impl Level {
    pub fn new(id: impl Into<LevelId>, course_id: impl Into<CourseId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            course_id: course_id.into(),
            title: title.into(),
            xp_reward: 0,
            narrative: String::new(),
            teaching_content: String::new(),
            video_urls: Vec::new(),
            quiz_questions: Vec::new(),
            coding_problems: Vec::new(),
            external_resources: Vec::new(),
            game_config: None,
            unlocked: false,
            completed: false,
            current_stage: Stage::Narrative,
        }
    }

    pub fn with_xp_reward(mut self, xp: u32) -> Self {
        self.xp_reward = xp;
        self
    }

    pub fn with_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narrative = narrative.into();
        self
    }

    pub fn with_teaching_content(mut self, content: impl Into<String>) -> Self {
        self.teaching_content = content.into();
        self
    }

    pub fn with_quiz_question(mut self, question: QuizQuestion) -> Self {
        self.quiz_questions.push(question);
        self
    }

    pub fn with_coding_problem(mut self, problem: CodingProblem) -> Self {
        self.coding_problems.push(problem);
        self
    }

    pub fn with_resource(mut self, resource: ExternalResource) -> Self {
        self.external_resources.push(resource);
        self
    }

    pub fn with_game(mut self, config: GameConfig) -> Self {
        self.game_config = Some(config);
        self
    }

    // =========================================================================
    // Progression Accessors (read-only)
    // =========================================================================

    #[inline]
    pub fn unlocked(&self) -> bool {
        self.unlocked
    }

    #[inline]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[inline]
    pub fn current_stage(&self) -> Stage {
        self.current_stage
    }

    pub fn has_external_resources(&self) -> bool {
        !self.external_resources.is_empty()
    }

    /// The stages this level actually visits, in pipeline order.
    pub fn stage_path(&self) -> Vec<Stage> {
        let placement = self.game_config.as_ref().map(|config| config.placement);

        let mut path = vec![Stage::Narrative];
        if placement == Some(GamePlacement::Teaching) {
            path.push(Stage::TeachingGame);
        }
        path.push(Stage::AiVideos);
        path.push(Stage::Assessment);
        if placement == Some(GamePlacement::Practice) {
            path.push(Stage::PracticeGame);
        }
        if self.has_external_resources() {
            path.push(Stage::Resources);
        }
        path.push(Stage::Complete);
        path
    }

    /// Next stage on this level's path after the current one.
    pub fn next_stage(&self) -> Option<Stage> {
        let current = self.current_stage.position();
        self.stage_path()
            .into_iter()
            .find(|stage| stage.position() > current)
    }

    /// Stage on this level's path immediately before the current one.
    ///
    /// If the current stage is not on the path, this is the nearest lower
    /// stage that is.
    pub fn previous_stage(&self) -> Option<Stage> {
        let current = self.current_stage.position();
        self.stage_path()
            .into_iter()
            .rev()
            .find(|stage| stage.position() < current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource() -> ExternalResource {
        ExternalResource {
            title: "Big-O cheat sheet".to_string(),
            url: "https://example.org/big-o".to_string(),
            kind: ResourceKind::Article,
        }
    }

    #[test]
    fn plain_level_visits_only_mandatory_stages() {
        let level = Level::new("dsa-1", "dsa", "Arrays");
        assert_eq!(
            level.stage_path(),
            vec![
                Stage::Narrative,
                Stage::AiVideos,
                Stage::Assessment,
                Stage::Complete
            ]
        );
    }

    #[test]
    fn stage_path_is_derived_from_game_and_resources() {
        let practice = Level::new("dsa-2", "dsa", "Stacks")
            .with_game(GameConfig::new("stack-tower", 60))
            .with_resource(resource());
        assert_eq!(
            practice.stage_path(),
            vec![
                Stage::Narrative,
                Stage::AiVideos,
                Stage::Assessment,
                Stage::PracticeGame,
                Stage::Resources,
                Stage::Complete
            ]
        );

        let teaching = Level::new("web-1", "web", "HTML")
            .with_game(GameConfig::new("tag-match", 50).with_placement(GamePlacement::Teaching));
        assert_eq!(
            teaching.stage_path(),
            vec![
                Stage::Narrative,
                Stage::TeachingGame,
                Stage::AiVideos,
                Stage::Assessment,
                Stage::Complete
            ]
        );
    }

    #[test]
    fn next_and_previous_follow_the_path() {
        let mut level =
            Level::new("dsa-2", "dsa", "Stacks").with_game(GameConfig::new("stack-tower", 60));
        assert_eq!(level.next_stage(), Some(Stage::AiVideos));
        assert_eq!(level.previous_stage(), None);

        level.current_stage = Stage::PracticeGame;
        assert_eq!(level.next_stage(), Some(Stage::Complete));
        assert_eq!(level.previous_stage(), Some(Stage::Assessment));

        level.current_stage = Stage::Complete;
        assert_eq!(level.next_stage(), None);
    }

    #[test]
    fn previous_stage_skips_to_nearest_stage_on_path() {
        // Game config was removed from the catalog while the learner sat in practice-game.
        let mut level = Level::new("dsa-3", "dsa", "Queues");
        level.current_stage = Stage::PracticeGame;
        assert_eq!(level.previous_stage(), Some(Stage::Assessment));
    }

    #[test]
    fn catalog_json_defaults_progression_fields() {
        let json = r#"{"id":"dsa-1","courseId":"dsa","title":"Arrays","xpReward":100}"#;
        let level: Level = serde_json::from_str(json).expect("deserialize");
        assert!(!level.unlocked());
        assert!(!level.completed());
        assert_eq!(level.current_stage(), Stage::Narrative);
        assert_eq!(level.xp_reward, 100);
    }
}
