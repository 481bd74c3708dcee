use ratatui::Frame;

use crate::{App, View};

/// A UI Screen boundary: responsible for rendering one view of the app
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Home screen - the test list with the profile header
pub struct HomeScreen;

impl Screen for HomeScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        crate::ui::render_home(app, f);
    }
}

/// Loading screen - shown while a content fetch is pending
pub struct LoadingScreen;

impl Screen for LoadingScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        crate::ui::render_loading(app, f);
    }
}

/// Quiz screen - the active question with its choices
pub struct QuizScreen;

impl Screen for QuizScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        crate::ui::render_quiz(app, f);
    }
}

/// Results screen - final score, tier message and summary
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        crate::ui::render_results(app, f);
    }
}

/// Not-found screen - a failed content fetch
pub struct NotFoundScreen;

impl Screen for NotFoundScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        crate::ui::render_not_found(app, f);
    }
}

/// Helper to construct the appropriate screen for the current view
pub fn current_screen(view: &View) -> Box<dyn Screen> {
    match view {
        View::Home => Box::new(HomeScreen),
        View::Loading => Box::new(LoadingScreen),
        View::Quiz => Box::new(QuizScreen),
        View::Results => Box::new(ResultsScreen),
        View::NotFound => Box::new(NotFoundScreen),
    }
}
