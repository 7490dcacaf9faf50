//! Single-screen layout: key pair on top, transport in the middle, chord
//! readout below, settings and keybindings at the bottom.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use rondo_audio::AudioReadState;
use rondo_core::state::AppState;
use rondo_types::{relate_chord, KeyRelation, TransportPhase, BEATS_PER_MEASURE};

pub fn draw(
    frame: &mut Frame,
    state: &AppState,
    audio: &AudioReadState,
    midi_port: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(frame.area());

    draw_keys(frame, chunks[0], audio);
    draw_transport(frame, chunks[1], state, audio);
    draw_chord(frame, chunks[2], state, audio);
    draw_status(frame, chunks[3], state, audio, midi_port);
}

fn draw_keys(frame: &mut Frame, area: Rect, audio: &AudioReadState) {
    let lines = vec![
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                audio.active_key.name(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("  next: "),
            Span::styled(audio.next_key.name(), Style::default().fg(Color::DarkGray)),
        ]),
    ];
    let block = Block::default().borders(Borders::ALL).title(" Key ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_transport(frame: &mut Frame, area: Rect, state: &AppState, audio: &AudioReadState) {
    let (status, style) = match audio.phase {
        TransportPhase::Stopped => ("stopped", Style::default().fg(Color::DarkGray)),
        TransportPhase::Preparing => ("prep", Style::default().fg(Color::Yellow)),
        TransportPhase::Running => ("running", Style::default().fg(Color::Green)),
    };

    let mut dots: Vec<Span> = Vec::new();
    for i in 1..=BEATS_PER_MEASURE {
        let on = audio.phase.is_active() && i == audio.beat;
        dots.push(Span::styled(
            if on { " \u{25cf}" } else { " \u{25cb}" },
            if on {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            },
        ));
    }

    let measure = format!(
        "  measure {}/{}  ",
        audio.measure, state.session.measures_to_change
    );
    let mut line = vec![Span::raw("  "), Span::styled(status, style), Span::raw(measure)];
    line.extend(dots);

    let lines = vec![
        Line::from(line),
        Line::from(format!("  {} bpm", state.session.bpm)),
    ];
    let block = Block::default().borders(Borders::ALL).title(" Transport ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_chord(frame: &mut Frame, area: Rect, state: &AppState, audio: &AudioReadState) {
    let relation = relate_chord(&state.detected_chord, audio.active_key);
    let relation_style = match relation {
        KeyRelation::Tonic => Style::default().fg(Color::Green),
        KeyRelation::Diatonic => Style::default().fg(Color::Cyan),
        KeyRelation::Other => Style::default().fg(Color::Yellow),
        KeyRelation::None => Style::default().fg(Color::DarkGray),
    };

    let lines = if state.session.midi_enabled {
        let label = state.detected_chord.label().unwrap_or_else(|| "-".to_string());
        vec![Line::from(vec![
            Span::raw("  "),
            Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(relation.name(), relation_style),
        ])]
    } else {
        vec![Line::from(Span::styled(
            "  MIDI off (press m)",
            Style::default().fg(Color::DarkGray),
        ))]
    };

    let block = Block::default().borders(Borders::ALL).title(" Chord ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    audio: &AudioReadState,
    midi_port: Option<&str>,
) {
    let mut lines = vec![
        Line::from(format!(
            "  keys: {}   prep bar: {}   volume: {:.0}%   midi: {}",
            state.session.category.name(),
            if state.session.prep_bar { "on" } else { "off" },
            state.session.click_volume * 100.0,
            midi_port.unwrap_or("-"),
        )),
        Line::from(Span::styled(
            "  space start/stop  r reset  \u{2191}\u{2193}/+- bpm  [ ] measures  c keys  p prep  , . volume  m midi  x clear notes  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    if let Some(err) = &audio.last_error {
        lines.push(Line::from(Span::styled(
            format!("  audio error: {}", err),
            Style::default().fg(Color::Red),
        )));
    }

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
