use aspire::serializers::{json, text};
use aspire::{Answers, AtomValue};
use tempfile::TempDir;

fn model_lines() -> Vec<String> {
    vec![
        "obj(a). obj(b). att(c).".to_string(),
        "".to_string(),
        "msg(\"x, y\"). pair((1,2)).".to_string(),
    ]
}

#[test]
fn save_then_load_keeps_models() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("models.txt");

    let captured = Answers::from_solver_output(
        [
            "Answer: 1",
            "obj(a). obj(b). att(c).",
            "Optimization: 7",
            "Answer: 2",
            "",
            "Answer: 3",
            "msg(\"x, y\"). pair((1,2)).",
        ]
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>(),
    )
    .careful_parsing()
    .unwrap();
    assert_eq!(text::save(&path, &captured).unwrap(), 3);

    let loaded = text::load(&path).unwrap().careful_parsing().unwrap();
    let sets: Vec<_> = loaded.answer_sets().map(|s| s.unwrap()).collect();
    let lines: Vec<String> = sets.iter().map(|s| s.to_line()).collect();
    assert_eq!(lines, model_lines());
    assert_eq!(sets[0].cost(), Some(&[7][..]));
    assert_eq!(sets.iter().map(|s| s.index()).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn exported_text_format() {
    let answers = Answers::from_lines(vec!["obj(a). obj(b). att(c).".to_string()]);
    let mut buffer = Vec::new();
    text::write_answers(&mut buffer, &answers).unwrap();
    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        "Answer: 1\nobj(a). obj(b). att(c).\n"
    );
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    match text::load(dir.path().join("absent.txt")) {
        Err(aspire::AspireError::Io(message)) => assert!(message.contains("absent.txt")),
        other => panic!("expected I/O error, got {:?}", other),
    }
}

#[test]
fn loaded_answers_reshape_like_live_ones() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("models.txt");
    let quoted_safe = Answers::from_lines(model_lines()).careful_parsing().unwrap();
    text::save(&path, &quoted_safe).unwrap();

    let answers = text::load(&path)
        .unwrap()
        .by_predicate()
        .unwrap()
        .discard_quotes()
        .unwrap();
    let models: Vec<_> = answers.iter().map(|m| m.unwrap()).collect();

    // the blank line is not a model when read as bare lines
    assert_eq!(models.len(), 2);
    assert_eq!(
        models[1].get("msg"),
        vec![&AtomValue::Args(vec![aspire::Arg::text("x, y")])]
    );
    assert!(json::to_json(&models[0]).unwrap().contains("\"obj\":[[\"a\"],[\"b\"]]"));
}
