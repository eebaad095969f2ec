//! Interactive chat screen.
//!
//! Renders one conversation as a transcript of "bubbles" and drives the
//! turn loop: user input becomes a `say` turn, turn responses append bot
//! bubbles, and a response may arm a one-shot delayed-response timer that
//! polls the bot for a self-initiated continuation unless the user speaks
//! first.

use crate::config::Settings;
use crate::pullstring::bot::StartOptions;
use crate::pullstring::{Bot, OutputItem, TurnRequest, TurnResponse};
use colored::Colorize;
use std::pin::Pin;
use std::time::Duration;
use tokio::io::{AsyncBufRead, Lines};
use tokio::time::Sleep;
use tracing::warn;

/// Who a bubble belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The remote agent.
    Bot,
    /// The local user.
    Human,
}

/// One transcript entry: a run of text lines from one speaker, or an
/// image.
#[derive(Debug, Clone)]
pub struct Bubble {
    /// Whose side of the transcript this sits on.
    pub speaker: Speaker,
    /// Text content, grown by concatenation of consecutive lines.
    pub text: Option<String>,
    /// Image URL for a `show_image` behavior.
    pub image: Option<String>,
}

/// Ordered transcript of a conversation.
#[derive(Debug, Default)]
pub struct Transcript {
    bubbles: Vec<Bubble>,
}

impl Transcript {
    /// Append a text line. Consecutive text lines from the same speaker
    /// concatenate into the previous bubble, unless that bubble carries an
    /// image. Returns true when the line was concatenated.
    pub fn push_text(&mut self, speaker: Speaker, text: &str) -> bool {
        if let Some(last) = self.bubbles.last_mut() {
            if last.speaker == speaker && last.image.is_none() {
                match &mut last.text {
                    Some(existing) => {
                        existing.push('\n');
                        existing.push_str(text);
                        return true;
                    }
                    None => {
                        last.text = Some(text.to_string());
                        return true;
                    }
                }
            }
        }
        self.bubbles.push(Bubble {
            speaker,
            text: Some(text.to_string()),
            image: None,
        });
        false
    }

    /// Append an image bubble. Images never concatenate.
    pub fn push_image(&mut self, speaker: Speaker, url: &str) {
        self.bubbles.push(Bubble {
            speaker,
            text: None,
            image: Some(url.to_string()),
        });
    }

    /// The transcript so far, in presentation order.
    #[must_use]
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }
}

/// Whether a turn response should arm the delayed-response timer, given
/// whether one is already pending. At most one timer is pending at a time.
#[must_use]
pub fn accept_interval(already_pending: bool, interval: Option<f64>) -> Option<Duration> {
    match interval {
        Some(seconds) if !already_pending && seconds.is_finite() && seconds >= 0.0 => {
            Some(Duration::from_secs_f64(seconds))
        }
        _ => None,
    }
}

enum Action {
    Say(String),
    Poll,
    Ignore,
    Quit,
}

/// One bot's chat screen: transcript plus the pending poll timer.
pub struct ChatScreen<'a> {
    bot: &'a mut Bot,
    start_options: StartOptions,
    language: Option<String>,
    locale: Option<String>,
    transcript: Transcript,
    delayed: Option<Pin<Box<Sleep>>>,
}

impl<'a> ChatScreen<'a> {
    /// Attach a screen to a bot.
    #[must_use]
    pub fn new(bot: &'a mut Bot, settings: &Settings) -> Self {
        Self {
            bot,
            start_options: settings.start_options(),
            language: settings.language.clone(),
            locale: settings.locale.clone(),
            transcript: Transcript::default(),
            delayed: None,
        }
    }

    /// Open the conversation: resume when the bot is active and still holds
    /// a conversation identifier (after asking), otherwise start fresh.
    async fn open<R>(&mut self, lines: &mut Lines<R>) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        if self.bot.is_active() && self.bot.conversation.is_some() {
            println!(
                "There is a currently active conversation with {}. Resume it? [r]esume / [n]ew",
                self.bot.name.bold()
            );
            let answer = lines.next_line().await?.unwrap_or_default();
            if answer.trim().eq_ignore_ascii_case("r") {
                self.resume().await;
                return Ok(());
            }
        }
        self.start().await;
        Ok(())
    }

    async fn start(&mut self) {
        let result = self.bot.start_conversation(&self.start_options).await;
        match result {
            Ok(response) => self.process(&response),
            Err(e) => warn!(bot = %self.bot.name, "start failed: {e}"),
        }
    }

    async fn resume(&mut self) {
        let appended = self.transcript.push_text(Speaker::Bot, "Resuming conversation..");
        self.render_text(Speaker::Bot, "Resuming conversation..", appended);
        self.send(None).await;
    }

    /// Send one turn: a user utterance, or `None` to let the bot speak
    /// next. Falls back to starting a new session when no conversation
    /// identifier is held (mirrors losing the id mid-session).
    async fn send(&mut self, text: Option<String>) {
        let Some(uuid) = self.bot.conversation.clone() else {
            self.start().await;
            return;
        };

        let request = TurnRequest {
            language: self.language.clone(),
            locale: self.locale.clone(),
            ..TurnRequest::say(text)
        };

        match self.bot.converse(&uuid, &request).await {
            Ok(response) => self.process(&response),
            Err(e) => warn!(bot = %self.bot.name, "turn failed: {e}"),
        }
    }

    /// Adopt the response onto the bot, render its outputs, and arm the
    /// delayed-response timer when the response asks for one.
    fn process(&mut self, response: &TurnResponse) {
        self.bot.adopt_conversation(response);

        for output in &response.outputs {
            self.render_output(output);
        }

        if let Some(duration) = accept_interval(self.delayed.is_some(), response.timed_response_interval)
        {
            self.delayed = Some(Box::pin(tokio::time::sleep(duration)));
        }
    }

    fn render_output(&mut self, output: &OutputItem) {
        if let Some(url) = output.image_url() {
            self.transcript.push_image(Speaker::Bot, url);
            println!("{} {}", format!("{}:", self.bot.name).cyan().bold(), format!("[image] {url}").magenta());
        }

        if let Some(text) = output.text.as_deref() {
            let appended = self.transcript.push_text(Speaker::Bot, text);
            self.render_text(Speaker::Bot, text, appended);
        }
    }

    fn render_text(&self, speaker: Speaker, text: &str, appended: bool) {
        match speaker {
            Speaker::Bot if appended => println!("  {text}"),
            Speaker::Bot => println!("{} {text}", format!("{}:", self.bot.name).cyan().bold()),
            Speaker::Human => println!("{} {text}", "you:".blue().bold()),
        }
    }

    /// Wait for the next thing to react to: a user line, the delayed poll
    /// firing, or end of input.
    async fn next_action<R>(&mut self, lines: &mut Lines<R>) -> anyhow::Result<Action>
    where
        R: AsyncBufRead + Unpin,
    {
        let delayed = &mut self.delayed;
        tokio::select! {
            line = lines.next_line() => match line? {
                None => Ok(Action::Quit),
                Some(line) => {
                    let text = line.trim();
                    if text == "/quit" {
                        Ok(Action::Quit)
                    } else if text.is_empty() {
                        Ok(Action::Ignore)
                    } else {
                        Ok(Action::Say(text.to_string()))
                    }
                }
            },
            () = async { if let Some(sleep) = delayed.as_mut() { sleep.await } }, if delayed.is_some() => {
                Ok(Action::Poll)
            }
        }
    }

    async fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => false,
            Action::Ignore => true,
            Action::Poll => {
                self.delayed = None;
                self.send(None).await;
                true
            }
            Action::Say(text) => {
                // The user spoke first: cancel any pending poll.
                self.delayed = None;
                let appended = self.transcript.push_text(Speaker::Human, &text);
                self.render_text(Speaker::Human, &text, appended);
                self.send(Some(text)).await;
                true
            }
        }
    }

    /// Drive the screen until the user quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only for input I/O failures; turn failures log at
    /// warn level and leave the transcript unchanged.
    pub async fn run<R>(&mut self, lines: &mut Lines<R>) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.open(lines).await?;
        loop {
            let action = self.next_action(lines).await?;
            if !self.dispatch(action).await {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_same_speaker_text_concatenates() {
        let mut transcript = Transcript::default();
        assert!(!transcript.push_text(Speaker::Bot, "Hello"));
        assert!(transcript.push_text(Speaker::Bot, "there"));
        assert_eq!(transcript.bubbles().len(), 1);
        assert_eq!(
            transcript.bubbles()[0].text.as_deref(),
            Some("Hello\nthere")
        );
    }

    #[test]
    fn speaker_change_starts_a_new_bubble() {
        let mut transcript = Transcript::default();
        transcript.push_text(Speaker::Bot, "Hello");
        assert!(!transcript.push_text(Speaker::Human, "hi"));
        assert!(!transcript.push_text(Speaker::Bot, "welcome back"));
        assert_eq!(transcript.bubbles().len(), 3);
    }

    #[test]
    fn image_bubbles_block_concatenation() {
        let mut transcript = Transcript::default();
        transcript.push_text(Speaker::Bot, "look at this");
        transcript.push_image(Speaker::Bot, "https://x/y.png");
        assert!(!transcript.push_text(Speaker::Bot, "nice, right?"));
        assert_eq!(transcript.bubbles().len(), 3);
        assert_eq!(
            transcript.bubbles()[1].image.as_deref(),
            Some("https://x/y.png")
        );
    }

    #[test]
    fn at_most_one_delayed_poll_is_pending() {
        assert_eq!(accept_interval(false, Some(2.5)), Some(Duration::from_secs_f64(2.5)));
        assert_eq!(accept_interval(true, Some(2.5)), None);
        assert_eq!(accept_interval(false, None), None);
        assert_eq!(accept_interval(false, Some(-1.0)), None);
        assert_eq!(accept_interval(false, Some(f64::NAN)), None);
    }
}
