//! Analyzer output through to markers, without the CLI.

use earthworm_analyzer::{SuggestionParser, parse_output};
use earthworm_markers::{AnnotationSession, BinderState, MarkerDescriptor, TextDocument, TokenId};
use earthworm_types::Suggestion;

use crate::common::{GAME_OUTPUT, GAME_PY};

fn anchor_texts<'a>(doc: &'a TextDocument, markers: &[MarkerDescriptor<TokenId>]) -> Vec<&'a str> {
    markers
        .iter()
        .filter_map(|m| doc.token_text(*m.anchor()))
        .collect()
}

#[test]
fn parsed_findings_anchor_to_first_code_on_their_line() {
    let suggestions = parse_output(GAME_OUTPUT);
    assert_eq!(
        suggestions,
        [
            Suggestion::new(1, " unused variable 'speed'"),
            Suggestion::new(
                2,
                "Refactor lines 3-5 into new function: \n    pos = state.pos\n    return pos + speed\n"
            ),
        ]
    );

    let mut session = AnnotationSession::new(TextDocument::new(GAME_PY));
    let summary = session.apply(suggestions);
    assert_eq!(summary.bound, 2);
    assert_eq!(summary.dropped, 0);

    let markers = session.markers().into_markers();
    assert_eq!(anchor_texts(session.document(), &markers), ["speed", "pos"]);
    assert!(markers[1].tooltip().starts_with("Refactor lines 3-5"));
}

#[test]
fn streaming_parser_matches_whole_output_parse() {
    let streamed: Vec<Suggestion> = SuggestionParser::new(GAME_OUTPUT.as_bytes())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(streamed, parse_output(GAME_OUTPUT));
}

#[test]
fn findings_past_end_of_file_are_dropped() {
    let output = "\tline 2: fine\n\tline 400: stale report\n";
    let mut session = AnnotationSession::new(TextDocument::new(GAME_PY));
    let summary = session.apply(parse_output(output));
    assert_eq!(summary.bound, 1);
    assert_eq!(summary.dropped, 1);
    assert_eq!(session.markers().markers().len(), 1);
}

#[test]
fn edit_invalidates_until_next_analysis() {
    let mut session = AnnotationSession::new(TextDocument::new(GAME_PY));
    session.apply(parse_output(GAME_OUTPUT));
    assert_eq!(session.markers().markers().len(), 2);

    session
        .document_mut()
        .replace_range(0..3, "async def")
        .unwrap();
    let outcome = session.markers();
    assert!(outcome.needs_refresh());
    assert!(outcome.markers().is_empty());
    assert_eq!(session.binder().state(), BinderState::Empty);
    assert!(!session.markers().needs_refresh());

    session.apply(parse_output(GAME_OUTPUT));
    assert_eq!(session.markers().markers().len(), 2);
}

#[test]
fn navigating_to_a_marker_dismisses_only_it() {
    let mut session = AnnotationSession::new(TextDocument::new(GAME_PY));
    session.apply(parse_output(GAME_OUTPUT));

    let markers = session.markers().into_markers();
    assert!(session.dismiss(markers[0].suggestion()));

    let remaining = session.markers().into_markers();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].suggestion(), markers[1].suggestion());
}

#[test]
fn repeated_findings_render_once() {
    // Blank line 4 anchors forward to `return`, like line 5 itself.
    let output = "\tline 4: consider early return\n\tline 5: consider early return\n";
    let mut session = AnnotationSession::new(TextDocument::new(GAME_PY));
    session.apply(parse_output(output));
    assert_eq!(session.binder().len(), 2);

    let markers = session.markers().into_markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(anchor_texts(session.document(), &markers), ["return"]);
}

#[cfg(unix)]
mod runner {
    use earthworm_analyzer::{AnalyzerConfig, AnalyzerRunner};

    use super::*;
    use crate::common::{write_analyzer, write_file};

    #[tokio::test]
    async fn analyzer_process_output_becomes_markers() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_file(dir.path(), "game.py", GAME_PY);
        let analyzer = write_analyzer(
            dir.path(),
            "analyzer3",
            &format!("cat <<'OUT'\n{GAME_OUTPUT}OUT\n"),
        );
        let interpreter = analyzer.with_file_name("analyzer");

        let runner = AnalyzerRunner::new(
            AnalyzerConfig::default()
                .with_interpreter(interpreter.display().to_string())
                .with_module(""),
        );
        let report = runner.run(&source, Some("3")).await.unwrap();
        assert!(report.is_clean());

        let mut session = AnnotationSession::new(TextDocument::new(GAME_PY));
        session.apply(report.into_suggestions());
        assert_eq!(session.markers().markers().len(), 2);
    }

    #[tokio::test]
    async fn failing_analyzer_degrades_to_no_markers() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_file(dir.path(), "game.py", GAME_PY);
        let runner = AnalyzerRunner::new(
            AnalyzerConfig::default().with_interpreter(dir.path().join("missing").display().to_string()),
        );

        let mut session = AnnotationSession::new(TextDocument::new(GAME_PY));
        session.apply(runner.run_or_empty(&source, None).await);
        assert!(session.markers().markers().is_empty());
        assert_eq!(session.binder().state(), BinderState::Bound);
    }
}
