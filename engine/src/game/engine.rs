use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use crate::highscore::HighScoreStore;
use crate::log;

use super::rng::GameRng;
use super::settings::GameSettings;
use super::snapshot::{CellKind, RenderSnapshot, TaggedCell};
use super::types::{CollisionMode, Direction, FieldSize, GameOverReason, PauseState, Point};

/// Owns the whole grid state and advances it one discrete step per `tick`.
/// The engine holds no timer; the session loop drives it and owns the pause
/// gate. Its only side effect is persisting a new high score.
pub struct GameEngine {
    settings: GameSettings,
    field_size: FieldSize,
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
    direction: Direction,
    pending_direction: Option<Direction>,
    food: Point,
    obstacles: HashSet<Point>,
    score: u32,
    high_score: u32,
    level: u32,
    target_score: u32,
    tick_interval: Duration,
    pause_state: PauseState,
    game_over: Option<GameOverReason>,
    high_score_store: Box<dyn HighScoreStore>,
}

impl GameEngine {
    pub fn new(
        settings: GameSettings,
        high_score_store: Box<dyn HighScoreStore>,
        rng: &mut GameRng,
    ) -> Self {
        let high_score = high_score_store.load();
        let mut engine = Self {
            field_size: settings.field_size(),
            body: VecDeque::new(),
            body_set: HashSet::new(),
            direction: Direction::Up,
            pending_direction: None,
            food: Point::new(0, 0),
            obstacles: HashSet::new(),
            score: 0,
            high_score,
            level: 1,
            target_score: settings.initial_target_score,
            tick_interval: settings.tick_interval_for_level(1),
            pause_state: PauseState::Running,
            game_over: None,
            settings,
            high_score_store,
        };
        engine.reset(rng);
        engine
    }

    /// Starts a fresh game. The high score is the only value that survives.
    pub fn reset(&mut self, rng: &mut GameRng) {
        self.body.clear();
        self.body_set.clear();
        let center = Point::new(self.field_size.width / 2, self.field_size.height / 2);
        self.body.push_back(center);
        self.body_set.insert(center);

        self.direction = Direction::Up;
        self.pending_direction = None;
        self.obstacles.clear();
        self.score = 0;
        self.level = 1;
        self.target_score = self.settings.initial_target_score;
        self.tick_interval = self.settings.tick_interval_for_level(1);
        self.pause_state = PauseState::Running;
        self.game_over = None;
        self.place_food(rng);
    }

    /// Buffers a direction change for the next tick. A request for the exact
    /// opposite of the current direction is silently ignored; last writer
    /// wins between ticks.
    pub fn set_direction(&mut self, requested: Direction) {
        if self.game_over.is_some() || requested.is_opposite(&self.direction) {
            return;
        }
        self.pending_direction = Some(requested);
    }

    /// One discrete step: move (wrapping), eat or advance the tail, then
    /// check the level threshold. Must not be called while paused; a no-op
    /// once the game is over.
    pub fn tick(&mut self, rng: &mut GameRng) {
        if self.game_over.is_some() {
            return;
        }

        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }

        let new_head = self.field_size.step(self.head(), self.direction);

        if self.settings.collision_mode == CollisionMode::Fatal
            && let Some(reason) = self.collision_at(new_head)
        {
            self.game_over = Some(reason);
            log!("Game over: {:?} at ({}, {})", reason, new_head.x, new_head.y);
            return;
        }

        self.body.push_front(new_head);
        self.body_set.insert(new_head);

        if new_head == self.food {
            self.score += 1;
            if self.score > self.high_score {
                self.high_score = self.score;
                self.high_score_store.save(self.high_score);
            }
            self.place_food(rng);
        } else {
            let tail = self.body.pop_back().expect("snake body is never empty");
            // In permissive mode the head may overlap the body, so the tail
            // cell can still be covered by another segment.
            if !self.body.contains(&tail) {
                self.body_set.remove(&tail);
            }
        }

        if self.score >= self.target_score {
            self.advance_level(rng);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.pause_state = match self.pause_state {
            PauseState::Running => PauseState::PausedByUser,
            PauseState::PausedByUser | PauseState::PausedBySystem => PauseState::Running,
        };
    }

    /// Lifecycle hook: losing the window pauses a running game.
    pub fn on_background(&mut self) {
        if self.pause_state == PauseState::Running {
            self.pause_state = PauseState::PausedBySystem;
        }
    }

    /// Lifecycle hook: regaining the window resumes only a system pause.
    pub fn on_foreground(&mut self) {
        if self.pause_state == PauseState::PausedBySystem {
            self.pause_state = PauseState::Running;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_state.is_paused()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let mut cells = Vec::with_capacity(self.body.len() + 1 + self.obstacles.len());
        for point in &self.body {
            cells.push(TaggedCell { point: *point, kind: CellKind::SnakeBody });
        }
        cells.push(TaggedCell { point: self.food, kind: CellKind::Food });
        for point in &self.obstacles {
            cells.push(TaggedCell { point: *point, kind: CellKind::Obstacle });
        }

        RenderSnapshot {
            field_size: self.field_size,
            cells,
            score: self.score,
            high_score: self.high_score,
            level: self.level,
            target_score: self.target_score,
            tick_interval: self.tick_interval,
            paused: self.is_paused(),
            game_over: self.game_over,
        }
    }

    fn head(&self) -> Point {
        *self.body.front().expect("snake body is never empty")
    }

    fn tail(&self) -> Point {
        *self.body.back().expect("snake body is never empty")
    }

    fn collision_at(&self, new_head: Point) -> Option<GameOverReason> {
        // The tail cell is vacated this tick, so entering it is legal.
        if self.body_set.contains(&new_head) && new_head != self.tail() {
            return Some(GameOverReason::SelfCollision);
        }
        if self.obstacles.contains(&new_head) {
            return Some(GameOverReason::ObstacleCollision);
        }
        None
    }

    fn advance_level(&mut self, rng: &mut GameRng) {
        self.level += 1;
        self.score = 0;
        self.target_score += self.settings.target_score_increment;
        self.tick_interval = self.settings.tick_interval_for_level(self.level);
        self.regenerate_obstacles(rng);
        log!(
            "Level {}: target {}, interval {} ms, {} obstacles",
            self.level,
            self.target_score,
            self.tick_interval.as_millis(),
            self.obstacles.len()
        );
    }

    /// Uniform rejection sampling over free cells. Terminates as long as the
    /// grid is not saturated, which gameplay never approaches.
    fn place_food(&mut self, rng: &mut GameRng) {
        loop {
            let candidate = rng.random_point(self.field_size);
            if !self.body_set.contains(&candidate) && !self.obstacles.contains(&candidate) {
                self.food = candidate;
                return;
            }
        }
    }

    fn regenerate_obstacles(&mut self, rng: &mut GameRng) {
        self.obstacles.clear();
        let count = (self.settings.obstacles_per_level * self.level) as usize;
        while self.obstacles.len() < count {
            let candidate = rng.random_point(self.field_size);
            if self.body_set.contains(&candidate) || candidate == self.food {
                continue;
            }
            self.obstacles.insert(candidate);
        }
    }

    #[cfg(test)]
    fn set_body(&mut self, points: &[Point], direction: Direction) {
        self.body.clear();
        self.body_set.clear();
        for point in points {
            self.body.push_back(*point);
            self.body_set.insert(*point);
        }
        self.direction = direction;
        self.pending_direction = None;
    }

    #[cfg(test)]
    fn set_food(&mut self, point: Point) {
        self.food = point;
    }

    #[cfg(test)]
    fn set_obstacles(&mut self, points: &[Point]) {
        self.obstacles = points.iter().copied().collect();
    }

    #[cfg(test)]
    fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    #[cfg(test)]
    fn direction(&self) -> Direction {
        self.direction
    }

    #[cfg(test)]
    fn food(&self) -> Point {
        self.food
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscore::InMemoryHighScoreStore;
    use std::sync::{Arc, Mutex};

    struct RecordingStore {
        initial: u32,
        saves: Arc<Mutex<Vec<u32>>>,
    }

    impl HighScoreStore for RecordingStore {
        fn load(&self) -> u32 {
            self.initial
        }

        fn save(&mut self, value: u32) {
            self.saves.lock().unwrap().push(value);
        }
    }

    fn create_engine(settings: GameSettings) -> (GameEngine, GameRng) {
        let mut rng = GameRng::new(42);
        let engine = GameEngine::new(settings, Box::new(InMemoryHighScoreStore::default()), &mut rng);
        (engine, rng)
    }

    fn snake_cells(engine: &GameEngine) -> Vec<Point> {
        engine.snapshot().snake_cells().collect()
    }

    #[test]
    fn test_new_game_starts_at_center() {
        let (engine, _) = create_engine(GameSettings::default());
        let snapshot = engine.snapshot();

        assert_eq!(snake_cells(&engine), vec![Point::new(10, 10)]);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.tick_interval, Duration::from_millis(250));
        assert!(!snapshot.paused);
        assert!(snapshot.game_over.is_none());
        assert!(!engine.body_set.contains(&engine.food()));
    }

    #[test]
    fn test_tick_moves_up_without_growing() {
        let (mut engine, mut rng) = create_engine(GameSettings::default());
        engine.set_food(Point::new(0, 0));

        engine.tick(&mut rng);

        assert_eq!(snake_cells(&engine), vec![Point::new(10, 9)]);
        assert_eq!(engine.snapshot().score, 0);
    }

    #[test]
    fn test_tick_wraps_on_every_edge() {
        let cases = [
            (Point::new(10, 0), Direction::Up, Point::new(10, 19)),
            (Point::new(10, 19), Direction::Down, Point::new(10, 0)),
            (Point::new(0, 10), Direction::Left, Point::new(19, 10)),
            (Point::new(19, 10), Direction::Right, Point::new(0, 10)),
        ];

        for (start, direction, expected) in cases {
            let (mut engine, mut rng) = create_engine(GameSettings::default());
            engine.set_body(&[start], direction);
            engine.set_food(Point::new(5, 5));

            engine.tick(&mut rng);

            assert_eq!(snake_cells(&engine), vec![expected]);
        }
    }

    #[test]
    fn test_reversal_is_rejected() {
        let (mut engine, mut rng) = create_engine(GameSettings::default());
        engine.set_food(Point::new(0, 0));

        engine.set_direction(Direction::Down);
        engine.tick(&mut rng);

        assert_eq!(engine.direction(), Direction::Up);
        assert_eq!(snake_cells(&engine), vec![Point::new(10, 9)]);
    }

    #[test]
    fn test_perpendicular_turn_is_accepted() {
        let (mut engine, mut rng) = create_engine(GameSettings::default());
        engine.set_food(Point::new(0, 0));

        engine.set_direction(Direction::Left);
        engine.tick(&mut rng);

        assert_eq!(engine.direction(), Direction::Left);
        assert_eq!(snake_cells(&engine), vec![Point::new(9, 10)]);
    }

    #[test]
    fn test_last_direction_request_wins() {
        let (mut engine, mut rng) = create_engine(GameSettings::default());
        engine.set_food(Point::new(0, 0));

        engine.set_direction(Direction::Left);
        engine.set_direction(Direction::Right);
        engine.tick(&mut rng);

        assert_eq!(snake_cells(&engine), vec![Point::new(11, 10)]);
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let (mut engine, mut rng) = create_engine(GameSettings::default());
        engine.set_food(Point::new(10, 9));

        engine.tick(&mut rng);
        let snapshot = engine.snapshot();

        assert_eq!(snake_cells(&engine), vec![Point::new(10, 9), Point::new(10, 10)]);
        assert_eq!(snapshot.score, 1);
        assert_eq!(snapshot.high_score, 1);
        assert!(!engine.body_set.contains(&engine.food()));
    }

    #[test]
    fn test_food_is_never_placed_on_snake_or_obstacles() {
        let (mut engine, mut rng) = create_engine(GameSettings::default());

        // Leave a single free cell so the sampler has exactly one answer.
        let mut body = Vec::new();
        for x in 0..20 {
            for y in 0..10 {
                body.push(Point::new(x, y));
            }
        }
        let mut obstacles = Vec::new();
        for x in 0..20 {
            for y in 10..20 {
                let point = Point::new(x, y);
                if point != Point::new(3, 13) {
                    obstacles.push(point);
                }
            }
        }
        engine.set_body(&body, Direction::Up);
        engine.set_obstacles(&obstacles);

        engine.place_food(&mut rng);

        assert_eq!(engine.food(), Point::new(3, 13));
    }

    #[test]
    fn test_high_score_saved_exactly_when_exceeded() {
        let saves = Arc::new(Mutex::new(Vec::new()));
        let store = RecordingStore { initial: 2, saves: Arc::clone(&saves) };
        let mut rng = GameRng::new(42);
        let mut engine = GameEngine::new(GameSettings::default(), Box::new(store), &mut rng);

        assert_eq!(engine.snapshot().high_score, 2);

        // First two meals only match the stored high score.
        for _ in 0..4 {
            let next = engine.field_size.step(engine.head(), engine.direction());
            engine.set_food(next);
            engine.tick(&mut rng);
        }

        assert_eq!(engine.snapshot().score, 4);
        assert_eq!(engine.snapshot().high_score, 4);
        assert_eq!(*saves.lock().unwrap(), vec![3, 4]);
    }

    #[test]
    fn test_high_score_survives_reset() {
        let (mut engine, mut rng) = create_engine(GameSettings::default());
        engine.set_food(Point::new(10, 9));
        engine.tick(&mut rng);
        assert_eq!(engine.snapshot().high_score, 1);

        engine.reset(&mut rng);
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.high_score, 1);
        assert_eq!(snake_cells(&engine), vec![Point::new(10, 10)]);
    }

    #[test]
    fn test_level_advance_literal_scenario() {
        let settings = GameSettings { initial_target_score: 1, ..GameSettings::default() };
        let (mut engine, mut rng) = create_engine(settings);
        engine.set_food(Point::new(10, 9));

        engine.tick(&mut rng);
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.level, 2);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.target_score, 3);
        assert_eq!(snapshot.tick_interval, Duration::from_millis(230));

        let obstacles: Vec<Point> = snapshot
            .cells
            .iter()
            .filter(|cell| cell.kind == CellKind::Obstacle)
            .map(|cell| cell.point)
            .collect();
        assert_eq!(obstacles.len(), 4);
        for obstacle in &obstacles {
            assert!(!engine.body_set.contains(obstacle));
            assert_ne!(*obstacle, engine.food());
        }
    }

    #[test]
    fn test_single_level_advance_per_tick() {
        let settings = GameSettings { initial_target_score: 1, ..GameSettings::default() };
        let (mut engine, mut rng) = create_engine(settings);

        // Even a score far past the threshold advances exactly one level.
        engine.set_score(7);
        engine.set_food(Point::new(10, 9));
        engine.tick(&mut rng);
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.level, 2);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.target_score, 3);
    }

    #[test]
    fn test_obstacle_count_scales_with_level() {
        let settings = GameSettings { initial_target_score: 1, ..GameSettings::default() };
        let (mut engine, mut rng) = create_engine(settings);

        for expected_level in 2..=4 {
            engine.set_score(engine.snapshot().target_score);
            let next = engine.field_size.step(engine.head(), engine.direction());
            engine.set_food(next);
            engine.tick(&mut rng);

            let snapshot = engine.snapshot();
            assert_eq!(snapshot.level, expected_level);
            let obstacle_count = snapshot
                .cells
                .iter()
                .filter(|cell| cell.kind == CellKind::Obstacle)
                .count();
            assert_eq!(obstacle_count, 2 * expected_level as usize);
        }
    }

    #[test]
    fn test_pause_toggle_and_lifecycle_hooks() {
        let (mut engine, _) = create_engine(GameSettings::default());

        assert!(!engine.is_paused());
        engine.toggle_pause();
        assert!(engine.is_paused());
        engine.toggle_pause();
        assert!(!engine.is_paused());

        engine.on_background();
        assert!(engine.is_paused());
        engine.on_foreground();
        assert!(!engine.is_paused());
    }

    #[test]
    fn test_user_pause_survives_backgrounding() {
        let (mut engine, _) = create_engine(GameSettings::default());

        engine.toggle_pause();
        engine.on_background();
        engine.on_foreground();
        assert!(engine.is_paused(), "a user pause must not be lifted by refocusing");

        engine.toggle_pause();
        assert!(!engine.is_paused());
    }

    #[test]
    fn test_permissive_mode_allows_self_overlap() {
        let (mut engine, mut rng) = create_engine(GameSettings::default());
        let body = [
            Point::new(5, 5),
            Point::new(6, 5),
            Point::new(6, 6),
            Point::new(5, 6),
            Point::new(4, 6),
        ];
        engine.set_body(&body, Direction::Down);
        engine.set_food(Point::new(0, 0));

        engine.tick(&mut rng);

        assert!(engine.snapshot().game_over.is_none());
        assert_eq!(snake_cells(&engine).len(), 5);
        assert_eq!(engine.head(), Point::new(5, 6));
        // (5, 6) is doubly occupied; the set must still know about it.
        assert!(engine.body_set.contains(&Point::new(5, 6)));

        engine.tick(&mut rng);
        assert!(engine.snapshot().game_over.is_none());
        assert!(engine.body_set.contains(&Point::new(5, 6)));
    }

    #[test]
    fn test_fatal_mode_self_collision_ends_game() {
        let settings = GameSettings { collision_mode: CollisionMode::Fatal, ..GameSettings::default() };
        let (mut engine, mut rng) = create_engine(settings);
        let body = [
            Point::new(5, 5),
            Point::new(6, 5),
            Point::new(6, 6),
            Point::new(5, 6),
            Point::new(4, 6),
        ];
        engine.set_body(&body, Direction::Down);
        engine.set_food(Point::new(0, 0));

        engine.tick(&mut rng);

        assert_eq!(engine.snapshot().game_over, Some(GameOverReason::SelfCollision));
        assert_eq!(engine.head(), Point::new(5, 5), "the snake stops in place");
        assert_eq!(snake_cells(&engine).len(), 5);
    }

    #[test]
    fn test_fatal_mode_allows_entering_vacated_tail() {
        let settings = GameSettings { collision_mode: CollisionMode::Fatal, ..GameSettings::default() };
        let (mut engine, mut rng) = create_engine(settings);
        let body = [
            Point::new(5, 5),
            Point::new(5, 6),
            Point::new(6, 6),
            Point::new(6, 5),
        ];
        engine.set_body(&body, Direction::Right);
        engine.set_food(Point::new(0, 0));

        engine.tick(&mut rng);

        assert!(engine.snapshot().game_over.is_none());
        assert_eq!(engine.head(), Point::new(6, 5));
        assert_eq!(snake_cells(&engine).len(), 4);
    }

    #[test]
    fn test_fatal_mode_obstacle_ends_game() {
        let settings = GameSettings { collision_mode: CollisionMode::Fatal, ..GameSettings::default() };
        let (mut engine, mut rng) = create_engine(settings);
        engine.set_obstacles(&[Point::new(10, 9)]);
        engine.set_food(Point::new(0, 0));

        engine.tick(&mut rng);

        assert_eq!(engine.snapshot().game_over, Some(GameOverReason::ObstacleCollision));
        assert_eq!(snake_cells(&engine), vec![Point::new(10, 10)]);
    }

    #[test]
    fn test_permissive_mode_ignores_obstacles() {
        let (mut engine, mut rng) = create_engine(GameSettings::default());
        engine.set_obstacles(&[Point::new(10, 9)]);
        engine.set_food(Point::new(0, 0));

        engine.tick(&mut rng);

        assert!(engine.snapshot().game_over.is_none());
        assert_eq!(snake_cells(&engine), vec![Point::new(10, 9)]);
    }

    #[test]
    fn test_game_over_freezes_the_engine() {
        let settings = GameSettings { collision_mode: CollisionMode::Fatal, ..GameSettings::default() };
        let (mut engine, mut rng) = create_engine(settings);
        engine.set_obstacles(&[Point::new(10, 9)]);
        engine.set_food(Point::new(0, 0));

        engine.tick(&mut rng);
        assert!(engine.is_game_over());

        engine.set_direction(Direction::Left);
        engine.tick(&mut rng);

        assert_eq!(snake_cells(&engine), vec![Point::new(10, 10)]);
        assert_eq!(engine.direction(), Direction::Up);
    }

    #[test]
    fn test_reset_clears_game_over() {
        let settings = GameSettings { collision_mode: CollisionMode::Fatal, ..GameSettings::default() };
        let (mut engine, mut rng) = create_engine(settings);
        engine.set_obstacles(&[Point::new(10, 9)]);
        engine.set_food(Point::new(0, 0));
        engine.tick(&mut rng);
        assert!(engine.is_game_over());

        engine.reset(&mut rng);

        assert!(!engine.is_game_over());
        assert_eq!(snake_cells(&engine), vec![Point::new(10, 10)]);
        assert_eq!(engine.snapshot().level, 1);
    }

    #[test]
    fn test_snapshot_orders_snake_head_first() {
        let (mut engine, _) = create_engine(GameSettings::default());
        let body = [Point::new(5, 5), Point::new(5, 6), Point::new(5, 7)];
        engine.set_body(&body, Direction::Up);

        let cells: Vec<Point> = engine.snapshot().snake_cells().collect();
        assert_eq!(cells, body);
    }
}
