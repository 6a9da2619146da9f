mod command;

pub use command::{Command, CommandError};

use crate::api::ApiClient;
use crate::config::Config;
use crate::route::{Route, RouteError, resolve};
use crate::ui::{SCREEN_WIDTH, nav};
use crate::views::{Navigation, Screen, home};
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

/// What a command asks the app to do next.
#[derive(Debug, PartialEq)]
enum Reaction {
    Navigate(Navigation),
    Back,
    Reload,
    Redraw,
    Nothing,
    Help,
}

/// Owns the current location, its history, and the screen loaded for it.
///
/// The location is the only state that outlives a navigation; each load
/// builds a fresh screen, so list search/sort/filter state starts over.
pub struct App<W: Write> {
    api: ApiClient,
    config: Config,
    location: String,
    history: Vec<String>,
    screen: Screen,
    out: W,
}

impl<W: Write> App<W> {
    pub fn new(api: ApiClient, config: Config, out: W) -> Self {
        Self {
            api,
            config,
            location: "/".to_string(),
            history: Vec::new(),
            screen: Screen::Home,
            out,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn render(&self) -> String {
        format!(
            "{}{}",
            nav::render(self.location_path()),
            self.screen.render(SCREEN_WIDTH)
        )
    }

    fn location_path(&self) -> &str {
        self.location
            .split_once('?')
            .map(|(path, _)| path)
            .unwrap_or(&self.location)
    }

    pub async fn navigate(&mut self, navigation: Navigation) -> Result<()> {
        let target = match resolve(&self.location, &navigation.target) {
            Ok(target) => target,
            Err(e) => {
                writeln!(self.out, "{}", e)?;
                return Ok(());
            }
        };

        if !navigation.replace {
            self.history.push(self.location.clone());
        }
        self.location = target;
        self.load().await
    }

    async fn back(&mut self) -> Result<()> {
        match self.history.pop() {
            Some(previous) => {
                self.location = previous;
                self.load().await
            }
            None => {
                writeln!(self.out, "Nothing to go back to")?;
                Ok(())
            }
        }
    }

    async fn load(&mut self) -> Result<()> {
        info!("Navigating to {}", self.location);
        writeln!(self.out, "Loading...")?;
        self.out.flush()?;

        self.screen = match Route::parse(&self.location, self.config.default_limit) {
            Ok(route) => match Screen::load(&self.api, &route, self.config.timezone).await {
                Ok(screen) => screen,
                Err(e) => {
                    let e = anyhow::Error::from(e);
                    error!("Failed to load {}: {:#}", self.location, e);
                    Screen::Failed(format!("{:#}", e))
                }
            },
            Err(RouteError::NotFound(path)) => Screen::NotFound(path),
            Err(e @ RouteError::InvalidLocation(..)) => Screen::NotFound(e.to_string()),
        };

        self.draw()
    }

    fn draw(&mut self) -> Result<()> {
        let screen = self.render();
        write!(self.out, "{}", screen)?;
        self.out.flush()?;
        Ok(())
    }

    /// Applies a command to the current screen without touching the network.
    fn dispatch(&mut self, command: Command) -> Result<Reaction, CommandError> {
        let name = command.name();
        match command {
            Command::Go(target) => return Ok(Reaction::Navigate(Navigation::push(target))),
            Command::Back => return Ok(Reaction::Back),
            Command::Refresh => return Ok(Reaction::Reload),
            Command::Help => return Ok(Reaction::Help),
            Command::Quit => return Ok(Reaction::Nothing),
            _ => {}
        }

        let next = match (&mut self.screen, command) {
            (Screen::Home, Command::Open(reference)) => {
                let position = reference
                    .parse()
                    .map_err(|_| CommandError::InvalidNumber(reference.clone()))?;
                Some(home::open(position).ok_or(CommandError::NoSuchItem(reference))?)
            }
            (Screen::Alerts(view), Command::Open(reference)) => {
                Some(view.open(&reference).ok_or(CommandError::NoSuchItem(reference))?)
            }
            (Screen::Conversations(view), command) => {
                let list = &mut view.list;
                match command {
                    Command::Search(text) => {
                        list.set_search(text);
                        return Ok(Reaction::Redraw);
                    }
                    Command::Clear => {
                        list.clear_search();
                        return Ok(Reaction::Redraw);
                    }
                    Command::Sort(column) => {
                        list.toggle_sort(&column)?;
                        return Ok(Reaction::Redraw);
                    }
                    Command::Filter { column, filter } => {
                        list.set_filter(&column, filter)?;
                        return Ok(Reaction::Redraw);
                    }
                    Command::Unfilter(column) => {
                        list.clear_filter(&column)?;
                        return Ok(Reaction::Redraw);
                    }
                    _ => {}
                }

                let (result, next) = match command {
                    Command::Open(reference) => {
                        let position = reference
                            .parse()
                            .map_err(|_| CommandError::InvalidNumber(reference.clone()))?;
                        view.interact(|list, events| list.click(position, events))
                    }
                    Command::First => view.interact(|list, events| {
                        list.first_page(events);
                        Ok(())
                    }),
                    Command::Prev => view.interact(|list, events| {
                        list.previous_page(events);
                        Ok(())
                    }),
                    Command::Next => view.interact(|list, events| {
                        list.next_page(events);
                        Ok(())
                    }),
                    Command::Last => view.interact(|list, events| {
                        list.last_page(events);
                        Ok(())
                    }),
                    Command::Size(size) => {
                        view.interact(|list, events| list.set_page_size(size, events))
                    }
                    Command::Action(index) => {
                        view.interact(|list, events| list.action(index, events))
                    }
                    _ => return Err(CommandError::NotHere(name)),
                };
                result?;
                next
            }
            _ => return Err(CommandError::NotHere(name)),
        };

        Ok(next.map(Reaction::Navigate).unwrap_or(Reaction::Nothing))
    }

    /// Runs one command, printing its result or the reason it was refused.
    pub async fn handle(&mut self, command: Command) -> Result<()> {
        match self.dispatch(command) {
            Ok(Reaction::Navigate(navigation)) => self.navigate(navigation).await,
            Ok(Reaction::Back) => self.back().await,
            Ok(Reaction::Reload) => self.load().await,
            Ok(Reaction::Redraw) => self.draw(),
            Ok(Reaction::Help) => {
                writeln!(self.out, "{}", command::HELP)?;
                Ok(())
            }
            Ok(Reaction::Nothing) => {
                writeln!(self.out, "Nothing to do")?;
                Ok(())
            }
            Err(e) => {
                writeln!(self.out, "{}", e)?;
                Ok(())
            }
        }
    }

    /// Opens `initial`, then reads commands from stdin until `quit` or end of input.
    pub async fn run(&mut self, initial: &str) -> Result<()> {
        self.navigate(Navigation::replace(initial)).await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.handle(command).await?,
                Err(e) => writeln!(self.out, "{}  (`help` lists commands)", e)?,
            }
        }

        info!("Bye");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_url: &str) -> Config {
        Config {
            api_url: api_url.to_string(),
            request_timeout: None,
            default_limit: 25,
            timezone: Tz::UTC,
        }
    }

    fn app(server: &MockServer) -> App<Vec<u8>> {
        let config = config(&server.uri());
        let api = ApiClient::new(&config).unwrap();
        App::new(api, config, Vec::new())
    }

    fn output(app: &mut App<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(&mut app.out)).unwrap()
    }

    fn page_body(page: u32, limit: u32, total: u64, ids: &[&str]) -> serde_json::Value {
        let conversations: Vec<_> = ids
            .iter()
            .map(|id| {
                json!({
                    "id": id, "title": format!("Conversation {}", id),
                    "user_id": "u1", "updated": "2024-03-01T10:00:00Z"
                })
            })
            .collect();
        json!({ "conversations": conversations, "page": page, "limit": limit, "total": total })
    }

    async fn mount_conversations(server: &MockServer) {
        for (page, ids) in [(1, ["a1", "a2"]), (2, ["b1", "b2"])] {
            Mock::given(method("GET"))
                .and(path("/conversations"))
                .and(query_param("page", page.to_string()))
                .and(query_param("limit", "2"))
                .respond_with(ResponseTemplate::new(200).set_body_json(page_body(page, 2, 4, &ids)))
                .mount(server)
                .await;
        }
    }

    #[tokio::test]
    async fn paging_round_trips_through_location() {
        let server = MockServer::start().await;
        mount_conversations(&server).await;
        let mut app = app(&server);

        app.navigate(Navigation::push("/conversations?page=1&limit=2"))
            .await
            .unwrap();
        app.handle(Command::Next).await.unwrap();
        assert_eq!(app.location(), "/conversations?page=2&limit=2");

        let out = output(&mut app);
        assert!(out.contains("Loading..."));
        assert!(out.contains("Conversation b1"));
        assert!(out.contains("Page 2 of 2"));

        app.handle(Command::Next).await.unwrap();
        assert_eq!(output(&mut app), "Nothing to do\n");

        app.handle(Command::Back).await.unwrap();
        assert_eq!(app.location(), "/conversations?page=1&limit=2");
    }

    #[tokio::test]
    async fn search_stays_local_and_resets_on_navigation() {
        let server = MockServer::start().await;
        mount_conversations(&server).await;
        let mut app = app(&server);

        app.navigate(Navigation::push("/conversations?page=1&limit=2"))
            .await
            .unwrap();
        let requests_before = server.received_requests().await.unwrap().len();

        app.handle(Command::Search("a2".to_string())).await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), requests_before);
        let Screen::Conversations(view) = app.screen() else {
            panic!("expected conversations screen");
        };
        assert_eq!(view.list.visible_rows().len(), 1);

        app.handle(Command::Refresh).await.unwrap();
        let Screen::Conversations(view) = app.screen() else {
            panic!("expected conversations screen");
        };
        assert_eq!(view.list.search(), "");
        assert_eq!(view.list.visible_rows().len(), 2);
    }

    #[tokio::test]
    async fn row_click_replaces_history_entry() {
        let server = MockServer::start().await;
        mount_conversations(&server).await;
        Mock::given(method("GET"))
            .and(path("/conversations"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 25, 2, &["a1", "a2"])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/conversations/a2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "a2", "title": "Conversation a2", "user_id": "u1",
                "updated": "2024-03-01T10:00:00Z"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/prompts"))
            .and(query_param("filter[conversation_id]", "a2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "prompts": [] })))
            .mount(&server)
            .await;

        let mut app = app(&server);
        app.navigate(Navigation::push("/alerts")).await.unwrap();
        app.navigate(Navigation::push("/conversations?page=1&limit=2"))
            .await
            .unwrap();
        app.handle(Command::Open("2".to_string())).await.unwrap();
        assert_eq!(app.location(), "/conversations/a2");

        let Screen::Conversations(view) = app.screen() else {
            panic!("expected conversations screen");
        };
        assert!(view.detail.is_some());

        app.handle(Command::Back).await.unwrap();
        assert_eq!(app.location(), "/alerts");
    }

    #[tokio::test]
    async fn load_failure_renders_failure_screen() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prompts"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let mut app = app(&server);
        app.navigate(Navigation::push("/alerts")).await.unwrap();
        assert!(matches!(app.screen(), Screen::Failed(_)));
        assert!(output(&mut app).contains("Something went wrong"));

        app.handle(Command::Go("/nowhere".to_string())).await.unwrap();
        assert!(matches!(app.screen(), Screen::NotFound(p) if p == "/nowhere"));
    }

    #[tokio::test]
    async fn refuses_commands_the_screen_cannot_handle() {
        let server = MockServer::start().await;
        let mut app = app(&server);

        app.handle(Command::Next).await.unwrap();
        assert_eq!(output(&mut app), "`next` does nothing on this screen\n");

        app.handle(Command::Open("9".to_string())).await.unwrap();
        assert_eq!(output(&mut app), "Nothing matches 9\n");

        app.handle(Command::Open("2".to_string())).await.unwrap();
        assert_eq!(app.location(), "/alerts");
    }
}
