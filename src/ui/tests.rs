use super::*;
use crate::app::{Message, Model, ViewMode, update};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(100, 30);
    Terminal::new(backend).unwrap()
}

fn create_test_model() -> Model {
    Model::new(None, "# Title\n\nHello world\n\n## Section\n\nMore text\n", (100, 30))
}

fn buffer_content(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(ratatui::buffer::Cell::symbol)
        .collect()
}

#[test]
fn test_render_split_view_shows_source_and_preview() {
    let model = create_test_model();
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&model, frame)).unwrap();

    let content = buffer_content(&terminal);
    // Source pane shows the raw markdown, preview the rendered heading.
    assert!(content.contains("# Title"));
    assert!(content.contains("Title"));
}

#[test]
fn test_render_shows_line_numbers() {
    let model = create_test_model();
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&model, frame)).unwrap();

    let content = buffer_content(&terminal);
    assert!(content.contains('1'));
    assert!(content.contains('7'));
}

#[test]
fn test_status_bar_shows_mode_and_filename() {
    let model = create_test_model();
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&model, frame)).unwrap();

    let content = buffer_content(&terminal);
    assert!(content.contains("SPLIT"));
    assert!(content.contains("untitled"));
    assert!(content.contains("Ln 1, Col 1"));
}

#[test]
fn test_status_bar_shows_modified_flag() {
    let model = update(create_test_model(), Message::InsertChar('x'));
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&model, frame)).unwrap();

    assert!(buffer_content(&terminal).contains("[modified]"));
}

#[test]
fn test_render_outline_sidebar() {
    let mut model = create_test_model();
    model = update(model, Message::ToggleOutline);
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&model, frame)).unwrap();

    let content = buffer_content(&terminal);
    assert!(content.contains("Outline"));
    assert!(content.contains("Section"));
}

#[test]
fn test_render_search_bar_with_match_count() {
    let mut model = create_test_model();
    model = update(model, Message::StartSearch);
    model = update(model, Message::SearchInput("Hello".to_string()));
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&model, frame)).unwrap();

    let content = buffer_content(&terminal);
    assert!(content.contains("/Hello"));
    assert!(content.contains("[1/1]"));
}

#[test]
fn test_render_help_overlay() {
    let model = update(create_test_model(), Message::ToggleHelp);
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&model, frame)).unwrap();

    let content = buffer_content(&terminal);
    assert!(content.contains("Help"));
    assert!(content.contains("Ctrl+S save"));
}

#[test]
fn test_render_preview_only_mode() {
    let mut model = create_test_model();
    model = update(model, Message::SetViewMode(ViewMode::Preview));
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&model, frame)).unwrap();

    let content = buffer_content(&terminal);
    assert!(content.contains("PREVIEW"));
    assert!(content.contains("Title"));
}

#[test]
fn test_render_tiny_terminal_does_not_panic() {
    let model = Model::new(None, "# T\n\nbody\n", (4, 3));
    let backend = TestBackend::new(4, 3);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| render(&model, frame)).unwrap();
}

#[test]
fn test_line_number_width() {
    assert_eq!(line_number_width(5), 1);
    assert_eq!(line_number_width(42), 2);
    assert_eq!(line_number_width(999), 3);
    assert_eq!(line_number_width(1_000), 4);
    assert_eq!(line_number_width(250_000), 6);
}
