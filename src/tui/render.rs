use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::api::{format_timestamp, UserRecord};
use crate::auth::{AuthField, AuthMode};
use crate::chat::Section;
use crate::constants::{UI_CHAT_LIST_WIDTH, UI_SIDEBAR_WIDTH};
use crate::tui::app::{App, InputMode};
use crate::tui::ui::mode_label;

/// Render the whole screen
pub fn render_ui(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let Some(user) = app.user().cloned() else {
        render_auth(frame, area, app);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(UI_SIDEBAR_WIDTH), Constraint::Min(20)].as_ref())
        .split(rows[0]);

    render_sidebar(frame, columns[0], app, &user);

    match app.section {
        Section::Chats => render_chats(frame, columns[1], app),
        Section::Shop => render_shop(frame, columns[1], app),
        Section::Profile => render_profile(frame, columns[1], &user),
        Section::Admin => render_admin(frame, columns[1], app),
        other => render_placeholder(frame, columns[1], other),
    }

    render_status_bar(frame, rows[1], app);

    if app.show_notification && app.navigator.total_unread() > 0 {
        render_notification(frame, area, app.navigator.total_unread());
    }
}

/// Render the login / register form
fn render_auth(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.auth_form;
    let width = area.width.min(50);
    let height = area.height.min(18);
    let card = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let title = match form.mode {
        AuthMode::Login => "Sign in to chat",
        AuthMode::Register => "Create an account",
    };

    let field = |label: &str, value: String, which: AuthField| {
        let focused = form.focus == which;
        let marker = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{marker}{label:<10}"), style),
            Span::raw(value),
        ])
    };

    let mut lines = vec![Line::from(""), Line::from("")];
    if form.mode == AuthMode::Register {
        lines.push(field("Name", form.full_name.clone(), AuthField::FullName));
    }
    lines.push(field("Email", form.email.clone(), AuthField::Email));
    lines.push(field(
        "Password",
        "•".repeat(form.password.chars().count()),
        AuthField::Password,
    ));
    lines.push(Line::from(""));

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("! {error}"),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    }

    if form.loading {
        lines.push(Line::from(Span::styled(
            "Working...",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        let toggle = match form.mode {
            AuthMode::Login => "No account? Ctrl+T to register",
            AuthMode::Register => "Have an account? Ctrl+T to sign in",
        };
        lines.push(Line::from(Span::styled(
            "Enter submit · Tab next field · Esc quit",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(Span::styled(
            toggle,
            Style::default().fg(Color::Blue),
        )));
    }

    if let Some(status) = &app.status_message {
        lines.push(Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" {title} "),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, card);
}

/// Render the section sidebar
fn render_sidebar(frame: &mut Frame, area: Rect, app: &App, user: &UserRecord) {
    let unread = app.navigator.total_unread();
    let items: Vec<ListItem> = Section::visible_for(user)
        .into_iter()
        .map(|section| {
            let mut spans = vec![Span::raw(format!(" {}", section.title()))];
            if section == Section::Chats && unread > 0 {
                spans.push(Span::styled(
                    format!(" {unread}"),
                    Style::default().fg(Color::White).bg(Color::Red),
                ));
            }
            let style = if section == app.section {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" {} ", user.avatar_initials))
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(list, area);
}

/// Render the chat list and the conversation pane
fn render_chats(frame: &mut Frame, area: Rect, app: &mut App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(UI_CHAT_LIST_WIDTH), Constraint::Min(20)].as_ref())
        .split(area);

    let active = app.navigator.active();
    let items: Vec<ListItem> = app
        .navigator
        .chats()
        .iter()
        .map(|chat| {
            let presence = if chat.online {
                Span::styled("● ", Style::default().fg(Color::Green))
            } else {
                Span::raw("  ")
            };
            let mut header = vec![
                presence,
                Span::styled(
                    format!("{} ", chat.avatar),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(chat.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("  {}", chat.time), Style::default().fg(Color::DarkGray)),
            ];
            if chat.unread > 0 {
                header.push(Span::styled(
                    format!(" ({})", chat.unread),
                    Style::default().fg(Color::Cyan),
                ));
            }
            let preview = Line::from(Span::styled(
                format!("    {}", chat.last_message),
                Style::default().fg(Color::Gray),
            ));
            let style = if Some(chat.id) == active {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(vec![Line::from(header), preview]).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Chats ")
                .borders(Borders::RIGHT)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_symbol("▌");
    let mut state = ListState::default().with_selected(Some(app.list_cursor));
    frame.render_stateful_widget(list, columns[0], &mut state);

    app.conversation_area = columns[1];
    render_conversation(frame, columns[1], app);
}

/// Shift the pane by the live drag so the swipe has visible feedback
fn shifted(area: Rect, cells: i32) -> Rect {
    let magnitude = u16::try_from(cells.unsigned_abs())
        .unwrap_or(u16::MAX)
        .min(area.width.saturating_sub(1));
    if cells >= 0 {
        Rect {
            x: area.x + magnitude,
            width: area.width - magnitude,
            ..area
        }
    } else {
        Rect {
            width: area.width - magnitude,
            ..area
        }
    }
}

fn render_conversation(frame: &mut Frame, area: Rect, app: &App) {
    let Some(chat) = app.navigator.active_chat() else {
        let placeholder = Paragraph::new(vec![
            Line::from(""),
            Line::from(Section::Chats.tagline()),
            Line::from(Span::styled(
                "Enter opens a chat · drag left/right to switch",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(placeholder, area);
        return;
    };

    let pane = shifted(area, app.pointer.cells(app.navigator.visual_offset()));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2), // Header
                Constraint::Min(3),    // Messages
                Constraint::Length(3), // Input
            ]
            .as_ref(),
        )
        .split(pane);

    let presence = if chat.online { "online" } else { "last seen recently" };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", chat.avatar), Style::default().fg(Color::Cyan)),
        Span::styled(chat.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {presence}"), Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, rows[0]);

    let mut lines = Vec::new();
    for message in app.navigator.thread(chat.id) {
        let (alignment, style) = if message.is_mine {
            (Alignment::Right, Style::default().fg(Color::Cyan))
        } else {
            (Alignment::Left, Style::default())
        };
        lines.push(Line::from(Span::styled(message.text.as_str(), style)).alignment(alignment));
        lines.push(
            Line::from(Span::styled(
                message.time.as_str(),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(alignment),
        );
        lines.push(Line::from(""));
    }
    let messages = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(messages, rows[1]);

    let (input_text, border) = if app.mode == InputMode::Insert {
        (format!("{}▏", app.input), Color::Cyan)
    } else if app.input.is_empty() {
        ("Press i to write a message...".to_string(), Color::DarkGray)
    } else {
        (app.input.clone(), Color::DarkGray)
    };
    let input = Paragraph::new(input_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(input, rows[2]);
}

/// Render the storefront
fn render_shop(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .products
        .iter()
        .map(|product| {
            let mut title = vec![
                Span::raw(format!("{} ", product.emoji)),
                Span::styled(product.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  {}", product.price_label()),
                    Style::default().fg(Color::Green),
                ),
            ];
            if let Some(badge) = &product.badge {
                title.push(Span::styled(
                    format!(" {badge}"),
                    Style::default().fg(Color::White).bg(Color::Red),
                ));
            }
            ListItem::new(vec![
                Line::from(title),
                Line::from(Span::styled(
                    format!("   {} · {}", product.description, product.category),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" Shop · {} ", Section::Shop.tagline()))
                .borders(Borders::NONE),
        )
        .highlight_symbol("▌")
        .highlight_style(Style::default().bg(Color::DarkGray));
    let mut state = ListState::default().with_selected(Some(app.shop_cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_profile(frame: &mut Frame, area: Rect, user: &UserRecord) {
    let role = if user.can_moderate() { "Administrator" } else { "Member" };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            user.avatar_initials.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            user.full_name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(user.email.as_str(), Style::default().fg(Color::Gray))),
        Line::from(role),
        Line::from(""),
        Line::from(Span::styled(
            "Shift+L to sign out",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Render the moderation panel
fn render_admin(frame: &mut Frame, area: Rect, app: &App) {
    let Some(panel) = app.admin.as_ref() else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)].as_ref())
        .split(area);

    if panel.is_loading() && panel.users().is_empty() {
        frame.render_widget(
            Paragraph::new("Loading users...").alignment(Alignment::Center),
            rows[0],
        );
    } else if panel.users().is_empty() {
        let text = panel
            .last_error()
            .map(|e| format!("Could not load users: {e}"))
            .unwrap_or_else(|| "No users to moderate".to_string());
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), rows[0]);
    } else {
        let items: Vec<ListItem> = panel
            .users()
            .iter()
            .map(|user| {
                let mut title = vec![
                    Span::styled(
                        format!("{} ", user.avatar_initials),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(
                        user.full_name.as_str(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  {}", user.email), Style::default().fg(Color::Gray)),
                ];
                if user.is_blocked {
                    title.push(Span::styled(" BLOCKED", Style::default().fg(Color::Red)));
                }
                if user.is_muted {
                    let until = user
                        .muted_until
                        .as_ref()
                        .map(|t| format!(" until {}", format_timestamp(Some(t))))
                        .unwrap_or_default();
                    title.push(Span::styled(
                        format!(" MUTED{until}"),
                        Style::default().fg(Color::Yellow),
                    ));
                }
                if panel.pending() == Some(user.id) {
                    title.push(Span::styled(" …", Style::default().fg(Color::DarkGray)));
                }
                let actions = user
                    .available_actions()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" / ");
                let style = if user.is_blocked {
                    Style::default().add_modifier(Modifier::DIM)
                } else {
                    Style::default()
                };
                ListItem::new(vec![
                    Line::from(title),
                    Line::from(Span::styled(
                        format!(
                            "   created {} · last seen {} · {}",
                            format_timestamp(user.created_at.as_ref()),
                            format_timestamp(user.last_seen.as_ref()),
                            actions
                        ),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
                .style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title(" Admin · User management ").borders(Borders::NONE))
            .highlight_symbol("▌")
            .highlight_style(Style::default().bg(Color::DarkGray));
        let mut state = ListState::default().with_selected(Some(panel.cursor()));
        frame.render_stateful_widget(list, rows[0], &mut state);
    }

    let hints = Paragraph::new(Line::from(Span::styled(
        "b block/unblock · m mute 1h · M mute 24h · u unmute · d delete · r refresh",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(hints, rows[1]);
}

fn render_placeholder(frame: &mut Frame, area: Rect, section: Section) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            section.title(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(section.tagline(), Style::default().fg(Color::Gray))),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode = mode_label(app);
    let mode_color = match app.mode {
        InputMode::Normal => Color::Green,
        InputMode::Insert => Color::Yellow,
        InputMode::Confirm => Color::Red,
    };

    let mut spans = vec![
        Span::styled(
            format!(" {mode} "),
            Style::default()
                .fg(Color::Black)
                .bg(mode_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];
    match &app.status_message {
        Some(status) => spans.push(Span::raw(status.as_str())),
        None => spans.push(Span::styled(
            "Tab sections · h/l prev/next chat · q quit",
            Style::default().fg(Color::DarkGray),
        )),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Small dismissible toast in the top-right corner
fn render_notification(frame: &mut Frame, area: Rect, unread: u32) {
    let width = 34.min(area.width);
    let toast = Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height: 4.min(area.height),
    };
    let body = Paragraph::new(vec![
        Line::from(format!("You have {unread} unread messages")),
        Line::from(Span::styled("n to dismiss", Style::default().fg(Color::DarkGray))),
    ])
    .block(
        Block::default()
            .title(" New messages ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(Clear, toast);
    frame.render_widget(body, toast);
}
