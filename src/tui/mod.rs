// terminal chat window

mod app;
mod event;
mod session;
mod theme;
mod ui;

pub use session::{ChatSession, Entry, Role};

use crossterm::{
    cursor::SetCursorStyle,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::core::{ChatClient, ChatReply};
use crate::Error;
use app::App;
use event::{Action, handle_event, poll_event};

pub async fn run(client: ChatClient) -> Result<(), Error> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, SetCursorStyle::BlinkingBar)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, Arc::new(client)).await;

    // restore terminal
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        SetCursorStyle::DefaultUserShape,
        LeaveAlternateScreen
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: Arc<ChatClient>,
) -> Result<(), Error> {
    let mut app = App::new(client.api_base());
    let mut pending: Option<JoinHandle<Result<ChatReply, Error>>> = None;

    while app.running {
        // collect the answer once the request task is done
        if pending.as_ref().is_some_and(|task| task.is_finished())
            && let Some(task) = pending.take()
        {
            let outcome = task
                .await
                .unwrap_or_else(|e| Err(Error::Transport(e.to_string())));
            app.finish(outcome);
        }

        terminal.draw(|frame| ui::render(frame, &mut app))?;

        let Some(event) = poll_event(Duration::from_millis(100))? else {
            continue;
        };

        match handle_event(&mut app, event) {
            Action::Quit => app.running = false,
            Action::Send(message) => {
                let client = Arc::clone(&client);
                pending = Some(tokio::spawn(async move { client.send(&message).await }));
            }
            Action::None => {}
        }
    }

    if let Some(task) = pending {
        task.abort();
    }

    Ok(())
}
