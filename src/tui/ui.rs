use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use crate::api::{AuthApi, AuthRequest, ModerationAction, ModerationApi, UserId};
use crate::auth::AuthMode;
use crate::chat::Section;
use crate::constants::{MUTE_LONG_HOURS, MUTE_SHORT_HOURS, UI_REFRESH_INTERVAL_MS};
use crate::gesture::SwipeDirection;
use crate::tui::render::render_ui;
use crate::tui::{ApiEvent, App, InputMode};

/// Run the terminal UI
pub async fn run_ui(mut app: App) -> Result<()> {
    // Check if we have an interactive terminal
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("messenger requires an interactive terminal.");
        eprintln!("   Use the subcommands (e.g. `messenger chats`) for scripting.");
        return Err(anyhow::anyhow!("No interactive terminal available"));
    }

    // Setup terminal; mouse capture is needed for swipes
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Channel for answers from background requests
    let (tx, mut rx) = mpsc::channel::<ApiEvent>(16);

    let res = run_app(&mut terminal, &mut app, tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tx: mpsc::Sender<ApiEvent>,
    rx: &mut mpsc::Receiver<ApiEvent>,
) -> Result<()> {
    while app.running {
        // Apply finished requests before drawing
        while let Ok(event) = rx.try_recv() {
            app.handle_api_event(event);
        }

        if app.admin_needs_refresh {
            app.admin_needs_refresh = false;
            if let Some(panel) = app.admin.as_mut() {
                let admin_id = panel.begin_refresh();
                spawn_refresh(app.moderation_api.clone(), admin_id, tx.clone());
            }
        }

        terminal.draw(|f| render_ui(f, app))?;

        if !event::poll(Duration::from_millis(UI_REFRESH_INTERVAL_MS))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                // Handle Ctrl+C to quit from anywhere
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    app.quit();
                    break;
                }

                if app.is_signed_in() {
                    handle_main_key(app, key, &tx);
                } else {
                    handle_auth_key(app, key, &tx);
                }
            }
            Event::Mouse(mouse) if app.is_signed_in() && app.section == Section::Chats => {
                let dragging = app.navigator.is_dragging();
                if let Some(gesture) = app.pointer.map(&mouse, app.conversation_area, dragging) {
                    if app.navigator.handle_gesture(gesture).changed() {
                        app.sync_cursor_to_active();
                    }
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn spawn_auth(api: Arc<dyn AuthApi>, request: AuthRequest, tx: mpsc::Sender<ApiEvent>) {
    tokio::spawn(async move {
        let result = api.authenticate(&request).await;
        let _ = tx.send(ApiEvent::Authenticated(result)).await;
    });
}

fn spawn_refresh(api: Arc<dyn ModerationApi>, admin_id: UserId, tx: mpsc::Sender<ApiEvent>) {
    tokio::spawn(async move {
        let result = api.list_users(admin_id).await;
        let _ = tx.send(ApiEvent::UsersLoaded(result)).await;
    });
}

fn spawn_moderation(
    api: Arc<dyn ModerationApi>,
    admin_id: UserId,
    user_id: UserId,
    action: ModerationAction,
    tx: mpsc::Sender<ApiEvent>,
) {
    tokio::spawn(async move {
        let result = api.apply(admin_id, user_id, action).await;
        let _ = tx
            .send(ApiEvent::Moderated {
                user_id,
                action,
                result,
            })
            .await;
    });
}

fn handle_auth_key(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<ApiEvent>) {
    let form = &mut app.auth_form;
    if form.loading {
        return;
    }

    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Tab | KeyCode::Down | KeyCode::Up => form.focus_next(),
        KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.toggle_mode()
        }
        KeyCode::Enter => {
            if let Some(request) = form.begin() {
                spawn_auth(app.auth_api.clone(), request, tx.clone());
            }
        }
        KeyCode::Backspace => {
            form.focused_value_mut().pop();
        }
        KeyCode::Char(c) => form.focused_value_mut().push(c),
        _ => {}
    }
}

fn handle_main_key(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<ApiEvent>) {
    match app.mode {
        InputMode::Insert => handle_insert_key(app, key),
        InputMode::Confirm => handle_confirm_key(app, key, tx),
        InputMode::Normal => handle_normal_key(app, key, tx),
    }
}

fn handle_insert_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.mode = InputMode::Normal,
        KeyCode::Enter => app.send_input(),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => app.input.push(c),
        _ => {}
    }
}

fn handle_confirm_key(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<ApiEvent>) {
    let Some(user_id) = app.pending_delete.take() else {
        app.mode = InputMode::Normal;
        return;
    };
    app.mode = InputMode::Normal;

    if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
        run_moderation(app, user_id, ModerationAction::Delete, tx);
    } else {
        app.set_status("Delete cancelled");
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<ApiEvent>) {
    app.clear_status();

    // Keys shared by every section
    match key.code {
        KeyCode::Char('q') => {
            app.quit();
            return;
        }
        KeyCode::Tab => {
            app.next_section();
            return;
        }
        KeyCode::BackTab => {
            app.previous_section();
            return;
        }
        KeyCode::Char('L') => {
            info!("logging out");
            app.logout();
            return;
        }
        KeyCode::Char('n') => {
            app.show_notification = false;
            return;
        }
        _ => {}
    }

    match app.section {
        Section::Chats => handle_chats_key(app, key),
        Section::Admin => handle_admin_key(app, key, tx),
        _ => match key.code {
            KeyCode::Down | KeyCode::Char('j') => app.cursor_down(),
            KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
            _ => {}
        },
    }
}

fn handle_chats_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => app.cursor_down(),
        KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Enter => app.open_highlighted_chat(),
        KeyCode::Esc => app.navigator.close(),
        KeyCode::Char('i') if app.navigator.active().is_some() => app.mode = InputMode::Insert,
        KeyCode::Left | KeyCode::Char('h') => {
            if app.navigator.step(SwipeDirection::Backward).changed() {
                app.sync_cursor_to_active();
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if app.navigator.step(SwipeDirection::Forward).changed() {
                app.sync_cursor_to_active();
            }
        }
        _ => {}
    }
}

fn handle_admin_key(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<ApiEvent>) {
    let Some(selected) = app
        .admin
        .as_ref()
        .and_then(|panel| panel.selected())
        .map(|u| (u.id, u.is_blocked, u.is_muted, u.full_name.clone()))
    else {
        if key.code == KeyCode::Char('r') {
            app.admin_needs_refresh = true;
        }
        return;
    };
    let (user_id, is_blocked, is_muted, full_name) = selected;

    let action = match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            app.cursor_down();
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.cursor_up();
            None
        }
        KeyCode::Char('r') => {
            app.admin_needs_refresh = true;
            None
        }
        KeyCode::Char('b') if is_blocked => Some(ModerationAction::Unblock),
        KeyCode::Char('b') => Some(ModerationAction::Block),
        KeyCode::Char('u') if is_muted => Some(ModerationAction::Unmute),
        KeyCode::Char('m') if !is_muted => Some(ModerationAction::Mute {
            duration_hours: Some(MUTE_SHORT_HOURS),
        }),
        KeyCode::Char('M') if !is_muted => Some(ModerationAction::Mute {
            duration_hours: Some(MUTE_LONG_HOURS),
        }),
        KeyCode::Char('d') => {
            app.pending_delete = Some(user_id);
            app.mode = InputMode::Confirm;
            app.set_status(format!("Delete user {}? (y/n)", full_name));
            None
        }
        _ => None,
    };

    if let Some(action) = action {
        run_moderation(app, user_id, action, tx);
    }
}

/// Start an action in the background; the answer comes back as `ApiEvent::Moderated`
fn run_moderation(
    app: &mut App,
    user_id: UserId,
    action: ModerationAction,
    tx: &mpsc::Sender<ApiEvent>,
) {
    let Some(panel) = app.admin.as_mut() else {
        return;
    };
    match panel.begin_apply(user_id) {
        Some(admin_id) => {
            spawn_moderation(app.moderation_api.clone(), admin_id, user_id, action, tx.clone());
            app.set_status(format!("Sending {action}..."));
        }
        None => app.set_status("Another action is still in progress"),
    }
}

/// Mode label for the status bar
pub(super) fn mode_label(app: &App) -> &'static str {
    if !app.is_signed_in() {
        return match app.auth_form.mode {
            AuthMode::Login => "LOGIN",
            AuthMode::Register => "REGISTER",
        };
    }
    match app.mode {
        InputMode::Normal => "NORMAL",
        InputMode::Insert => "INSERT",
        InputMode::Confirm => "CONFIRM",
    }
}
