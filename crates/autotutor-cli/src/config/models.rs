use autotutor::engine::config::TutorialConfig;
use autotutor::workflows::tutorial::Selectors;

pub struct AppConfig {
    pub selectors: Selectors,
    pub core_config: TutorialConfig,
}
