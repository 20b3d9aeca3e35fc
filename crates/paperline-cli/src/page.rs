//! Page controller: drives the title and content typewriters.

use std::sync::Arc;

use anyhow::Result;
use paperline_core::config::Config;
use paperline_core::document::ResumeDocument;
use paperline_core::render::{Section, render};
use paperline_core::sound::{SilentCue, SoundCue};
use paperline_core::typewriter::{Outcome, Typewriter};
use tracing::debug;

use crate::bell::BellCue;
use crate::screen::{Region, Screen};

#[derive(Debug, Clone)]
pub struct Page {
    screen: Arc<Screen>,
    title: Typewriter,
    content: Typewriter,
}

impl Page {
    pub fn new(config: &Config, screen: Arc<Screen>) -> Self {
        let sound_enabled = config.sound.enabled;
        let cue: Arc<dyn SoundCue> = if sound_enabled {
            Arc::new(BellCue::new(config.sound))
        } else {
            Arc::new(SilentCue)
        };

        let title = Typewriter::with_sound(config.title.options(sound_enabled), Arc::clone(&cue));
        title.bind(screen.surface(Region::Title));
        let content = Typewriter::with_sound(config.content.options(sound_enabled), cue);
        content.bind(screen.surface(Region::Content));

        Self {
            screen,
            title,
            content,
        }
    }

    pub fn screen(&self) -> &Arc<Screen> {
        &self.screen
    }

    /// Types the greeting and `section` side by side.
    ///
    /// With `instant` the greeting appears at once and only the section is
    /// animated.
    pub async fn show(
        &self,
        doc: &ResumeDocument,
        section: Section,
        instant: bool,
    ) -> Result<Outcome> {
        let greeting = doc.greeting();
        let body = render(section, doc);
        debug!(%section, instant, "Showing section");

        if instant {
            self.screen.surface(Region::Title).set_text(&greeting);
            return Ok(self.content.type_text(&body).await?);
        }

        let (title, content) =
            tokio::join!(self.title.type_text(&greeting), self.content.type_text(&body));
        Ok(combine(title?, content?))
    }

    /// Shows every section in order, erasing the previous one first.
    pub async fn tour(&self, doc: &ResumeDocument) -> Result<Outcome> {
        let mut sections = Section::ALL.into_iter();
        let Some(first) = sections.next() else {
            return Ok(Outcome::Completed);
        };

        if self.show(doc, first, false).await? == Outcome::Interrupted {
            return Ok(Outcome::Interrupted);
        }

        for section in sections {
            debug!(%section, "Turning page");
            if self.content.erase().await? == Outcome::Interrupted {
                return Ok(Outcome::Interrupted);
            }
            if self.content.type_text(&render(section, doc)).await? == Outcome::Interrupted {
                return Ok(Outcome::Interrupted);
            }
        }
        Ok(Outcome::Completed)
    }

    /// Stops both typewriters where they are.
    pub fn interrupt(&self) {
        self.title.interrupt();
        self.content.interrupt();
    }
}

fn combine(a: Outcome, b: Outcome) -> Outcome {
    if a == Outcome::Completed && b == Outcome::Completed {
        Outcome::Completed
    } else {
        Outcome::Interrupted
    }
}

#[cfg(test)]
mod tests {
    use paperline_core::config::TypewriterConfig;
    use paperline_core::surface::Surface;

    use super::*;

    fn quiet_config() -> Config {
        let fast = TypewriterConfig {
            type_speed_ms: 10,
            erase_speed_ms: 5,
        };
        let mut config = Config {
            title: fast,
            content: fast,
            ..Config::default()
        };
        config.sound.enabled = false;
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_types_title_and_content() {
        let screen = Screen::new(false);
        let page = Page::new(&quiet_config(), Arc::clone(&screen));
        let doc = ResumeDocument::fallback();

        let outcome = page.show(&doc, Section::About, false).await.unwrap();

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(screen.surface(Region::Title).text(), "Hi, I'm Becky!");
        assert_eq!(
            screen.surface(Region::Content).text(),
            render(Section::About, &doc)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_instant_sets_title_directly() {
        let screen = Screen::new(false);
        let page = Page::new(&quiet_config(), Arc::clone(&screen));
        let doc = ResumeDocument::fallback();

        page.show(&doc, Section::Contact, true).await.unwrap();

        assert_eq!(screen.surface(Region::Title).text(), "Hi, I'm Becky!");
        assert!(!page.title.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tour_ends_on_last_section() {
        let screen = Screen::new(false);
        let page = Page::new(&quiet_config(), Arc::clone(&screen));
        let doc = ResumeDocument::fallback();

        let outcome = page.tour(&doc).await.unwrap();

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(
            screen.surface(Region::Content).text(),
            render(Section::Contact, &doc)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_stops_both_typewriters() {
        let screen = Screen::new(false);
        let page = Page::new(&quiet_config(), Arc::clone(&screen));
        let doc = ResumeDocument::fallback();

        let running = {
            let page = page.clone();
            let doc = doc.clone();
            tokio::spawn(async move { page.show(&doc, Section::About, false).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(35)).await;
        page.interrupt();

        let outcome = running.await.unwrap().unwrap();

        assert_eq!(outcome, Outcome::Interrupted);
        let title = screen.surface(Region::Title).text();
        assert!(!title.is_empty() && title.len() < doc.greeting().len());
    }
}
