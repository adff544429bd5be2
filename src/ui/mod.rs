//! Terminal rendering of the application state. Pure projection: nothing in
//! here mutates the app or talks to the network.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::app::{
    App, AuthField, AuthMode, DashboardSection, FlashLevel, View, EVENT_FORM_FIELDS,
};
use crate::directory::{CategoryFilter, DirectoryRow};

const ACCENT: Color = Color::Magenta;
const DIM: Color = Color::DarkGray;

pub fn draw(frame: &mut Frame, app: &App) {
    match app.view {
        View::Login => draw_login(frame, app),
        View::Directory => draw_directory(frame, app),
        View::Dashboard => draw_dashboard(frame, app),
    }
}

fn chrome(frame: &mut Frame) -> (Rect, Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.size());
    (chunks[0], chunks[1], chunks[2], chunks[3])
}

fn draw_flash(frame: &mut Frame, app: &App, area: Rect) {
    let Some((level, message)) = &app.flash else {
        return;
    };
    let color = match level {
        FlashLevel::Success => Color::Green,
        FlashLevel::Error => Color::Red,
        FlashLevel::Info => Color::Cyan,
    };
    let line = Paragraph::new(message.as_str()).style(Style::default().fg(color));
    frame.render_widget(line, area);
}

fn hints(frame: &mut Frame, area: Rect, text: &str) {
    let line = Paragraph::new(text).style(Style::default().fg(DIM));
    frame.render_widget(line, area);
}

// --- Entry screen -----------------------------------------------------------

fn draw_login(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 60, frame.size());
    let title = match app.auth.mode {
        AuthMode::SignIn => " Sign In ",
        AuthMode::SignUp => " Create Account ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![
        Constraint::Length(2), // mode switch line
        Constraint::Length(2), // username
    ];
    if app.auth.mode == AuthMode::SignUp {
        constraints.push(Constraint::Length(2)); // email
    }
    constraints.extend([
        Constraint::Length(2), // password
        Constraint::Length(2), // status
        Constraint::Min(1),    // hints
    ]);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let tabs = Line::from(vec![
        mode_span("Sign In", app.auth.mode == AuthMode::SignIn),
        Span::raw("  |  "),
        mode_span("Sign Up", app.auth.mode == AuthMode::SignUp),
    ]);
    frame.render_widget(Paragraph::new(tabs).alignment(Alignment::Center), rows[0]);

    let mut row = 1;
    field_line(
        frame,
        rows[row],
        "Username",
        &app.auth.username,
        app.auth.field == AuthField::Username,
    );
    row += 1;
    if app.auth.mode == AuthMode::SignUp {
        field_line(
            frame,
            rows[row],
            "Email",
            &app.auth.email,
            app.auth.field == AuthField::Email,
        );
        row += 1;
    }
    let masked = "\u{2022}".repeat(app.auth.password.chars().count());
    field_line(
        frame,
        rows[row],
        "Password",
        &masked,
        app.auth.field == AuthField::Password,
    );
    row += 1;

    let status = if app.auth.loading {
        Span::styled("Signing in...", Style::default().fg(Color::Cyan))
    } else if let Some(message) = &app.auth.status {
        Span::styled(message.as_str(), Style::default().fg(Color::Red))
    } else {
        Span::raw("")
    };
    frame.render_widget(
        Paragraph::new(Line::from(status)).alignment(Alignment::Center),
        rows[row],
    );
    row += 1;

    frame.render_widget(
        Paragraph::new("←/→ switch mode · Tab next field · Enter submit · Esc quit")
            .style(Style::default().fg(DIM))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        rows[row],
    );
}

fn mode_span(label: &str, active: bool) -> Span<'_> {
    if active {
        Span::styled(
            label,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(label, Style::default().fg(DIM))
    }
}

fn field_line(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DIM)
    };
    let cursor = if focused { "_" } else { "" };
    let line = Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{label:>10}: "), label_style),
        Span::raw(value.to_string()),
        Span::styled(cursor, Style::default().fg(ACCENT)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

// --- Event directory --------------------------------------------------------

fn draw_directory(frame: &mut Frame, app: &App) {
    let (header, body, flash, footer) = chrome(frame);
    draw_filter_bar(frame, app, header, " UNIEVENT · Every Event. One Platform. ");
    draw_event_list(frame, app, body);
    draw_flash(frame, app, flash);
    let dash = if app
        .current_user
        .as_ref()
        .is_some_and(crate::session::can_access_dashboard)
    {
        " · d dashboard"
    } else {
        ""
    };
    hints(
        frame,
        footer,
        &format!("/ search · c category · j/k move · Space interest · r reload · q quit{dash}"),
    );
}

fn draw_filter_bar(frame: &mut Frame, app: &App, area: Rect, title: &str) {
    let category = match app.directory.category() {
        CategoryFilter::All => "All".to_string(),
        CategoryFilter::Only(tag) => tag.clone(),
    };
    let search_style = if app.searching {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };
    let cursor = if app.searching { "_" } else { "" };
    let line = Line::from(vec![
        Span::styled("Search: ", Style::default().fg(DIM)),
        Span::styled(format!("{}{}", app.directory.search(), cursor), search_style),
        Span::styled("    Category: ", Style::default().fg(DIM)),
        Span::styled(category, Style::default().fg(ACCENT)),
    ]);
    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_event_list(frame: &mut Frame, app: &App, area: Rect) {
    if app.directory.is_loading() && app.directory.is_empty() {
        frame.render_widget(
            Paragraph::new("Loading events...").style(Style::default().fg(DIM)),
            area,
        );
        return;
    }

    let mut card_index = 0usize;
    let items: Vec<ListItem> = app
        .directory
        .rows()
        .into_iter()
        .map(|row| match row {
            DirectoryRow::Card(card) => {
                let selected = card_index == app.selected;
                card_index += 1;
                let marker = if selected { "▸ " } else { "  " };
                let title_style = if selected {
                    Style::default().add_modifier(Modifier::BOLD).fg(ACCENT)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                let label_style = if card.interested {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(DIM)
                };
                let header = Line::from(vec![
                    Span::raw(marker),
                    Span::styled(card.event.title.clone(), title_style),
                    Span::styled(
                        format!("  [{}]", card.event.category_tag()),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(format!("  {}", card.interest_label()), label_style),
                ]);
                let detail = Line::from(Span::styled(
                    format!(
                        "    {} · {} · {}",
                        card.event.venue_text(),
                        card.event.date_text(),
                        card.event.organizer_name(),
                    ),
                    Style::default().fg(DIM),
                ));
                ListItem::new(vec![header, detail])
            }
            DirectoryRow::NoMatches => ListItem::new(Line::from(Span::styled(
                "No events match your search...",
                Style::default().fg(DIM).add_modifier(Modifier::BOLD),
            ))),
            DirectoryRow::LoadFailed(message) => ListItem::new(Line::from(Span::styled(
                format!("Failed to load events. {message}"),
                Style::default().fg(Color::Red),
            ))),
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Upcoming "));
    frame.render_widget(list, area);
}

// --- Dashboard --------------------------------------------------------------

fn draw_dashboard(frame: &mut Frame, app: &App) {
    let (header, body, flash, footer) = chrome(frame);

    let (title, desc) = app.section.title();
    let sections = Line::from(vec![
        section_span("1 Societies", app.section == DashboardSection::Societies),
        Span::raw("   "),
        section_span("2 Create Event", app.section == DashboardSection::CreateEvent),
        Span::raw("   "),
        section_span("3 Events", app.section == DashboardSection::Events),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} · {desc} "));
    frame.render_widget(Paragraph::new(sections).block(block), header);

    match app.section {
        DashboardSection::Societies => draw_societies(frame, app, body),
        DashboardSection::CreateEvent => draw_event_form(frame, app, body),
        DashboardSection::Events => {
            // The listing keeps its filter controls inside the dashboard too.
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(3)])
                .split(body);
            draw_filter_bar(frame, app, rows[0], " Published Events ");
            draw_event_list(frame, app, rows[1]);
        }
    }

    draw_flash(frame, app, flash);
    let hint = match app.section {
        DashboardSection::Societies => "j/k move · a approve · r reload · Esc directory · q quit",
        DashboardSection::CreateEvent => "Tab next field · Enter publish · Esc listing",
        DashboardSection::Events => "/ search · c category · Space interest · Esc directory · q quit",
    };
    hints(frame, footer, hint);
}

fn section_span(label: &str, active: bool) -> Span<'_> {
    if active {
        Span::styled(
            label,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(label, Style::default().fg(DIM))
    }
}

fn draw_societies(frame: &mut Frame, app: &App, area: Rect) {
    if app.societies_loading && app.societies.is_empty() {
        frame.render_widget(
            Paragraph::new("Loading societies...").style(Style::default().fg(DIM)),
            area,
        );
        return;
    }
    if app.societies.is_empty() {
        frame.render_widget(
            Paragraph::new("No societies registered yet").style(Style::default().fg(DIM)),
            area,
        );
        return;
    }

    let rows: Vec<Row> = app
        .societies
        .iter()
        .enumerate()
        .map(|(i, society)| {
            let status_style = if society.is_verified {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Yellow)
            };
            let row = Row::new(vec![
                Cell::from(society.name.clone()),
                Cell::from(society.email_text().to_string()),
                Cell::from(format!("{} Members", society.member_count)),
                Cell::from(society.status_text()).style(status_style),
            ]);
            if i == app.society_selected {
                row.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(
        Row::new(vec!["Name", "Email", "Members", "Status"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(" Societies "));
    frame.render_widget(table, area);
}

fn draw_event_form(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" New Event ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints: Vec<Constraint> = EVENT_FORM_FIELDS
        .iter()
        .map(|_| Constraint::Length(1))
        .collect();
    constraints.push(Constraint::Length(2));
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, label) in EVENT_FORM_FIELDS.iter().enumerate() {
        field_line(
            frame,
            rows[i],
            label,
            app.event_form.field_value(i),
            i == app.event_form.field && !app.event_form.submitting,
        );
    }

    let status = if app.event_form.submitting {
        Span::styled("Publishing...", Style::default().fg(Color::Cyan))
    } else if let Some(message) = &app.event_form.status {
        Span::styled(message.as_str(), Style::default().fg(Color::Red))
    } else {
        Span::raw("")
    };
    frame.render_widget(
        Paragraph::new(Line::from(status)),
        rows[EVENT_FORM_FIELDS.len()],
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
