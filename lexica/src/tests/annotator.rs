use crate::annotation::{concat_text, filter_by_type, Annotation};
use crate::annotator::config::PresetAnnotatorKind;
use crate::annotator::{Annotator, AnnotatorBuilder};
use crate::dictionary::Stopwords;
use crate::span::longest_spans;

const FIRST_NAMES: &str = include_str!("./resources/first-names.dict");
const LAST_NAMES: &str = include_str!("./resources/last-names.dict");
const SALUTATIONS: &str = include_str!("./resources/salutations.dict");
const VALEDICTIONS: &str = include_str!("./resources/valedictions.dict");

fn preset(kind: PresetAnnotatorKind) -> Annotator {
    let dict = match kind {
        PresetAnnotatorKind::FirstNames => FIRST_NAMES,
        PresetAnnotatorKind::LastNames => LAST_NAMES,
        PresetAnnotatorKind::Salutations => SALUTATIONS,
        PresetAnnotatorKind::Valedictions => VALEDICTIONS,
    };
    let mut builder = AnnotatorBuilder::from_preset(kind);
    builder.load_reader(dict.as_bytes()).unwrap();
    builder.build().unwrap()
}

fn texts(annotations: &[Annotation]) -> Vec<&str> {
    annotations.iter().map(|a| a.text()).collect()
}

/// プリセット辞書の読み込み（短い表記と予約行は除外される）
#[test]
fn test_first_names_loading() {
    let annotator = preset(PresetAnnotatorKind::FirstNames);
    assert_eq!(annotator.annotator_type(), "first-names");
    assert_eq!(annotator.num_mentions(), 8);
    assert!(annotator.contains("Mark"));
    assert!(!annotator.contains("al"));
    assert!(!annotator.contains("bob"));
}

/// メールアドレス中の名前は英数字の連続で分断されない位置でのみ一致する
#[test]
fn test_email_address() {
    let annotator = preset(PresetAnnotatorKind::FirstNames);
    let anns = annotator.annotate("Email mark.kosoglow@outreach.io");
    assert_eq!(texts(&anns), vec!["mark"]);
    assert_eq!(anns[0].range(), 6..10);
    assert_eq!(anns[0].values(), Some(&["Mark".to_string()][..]));
}

/// 英数字の途中で終わるマッチは出力されない
#[test]
fn test_no_partial_word() {
    let mut builder = AnnotatorBuilder::new("animals");
    builder.add_mention::<&str>("cat", &[]).unwrap();
    let annotator = builder.build().unwrap();
    assert!(annotator.annotate("cats").is_empty());
    assert!(annotator.annotate("concat").is_empty());
    assert_eq!(annotator.annotate("a cat.").len(), 1);
}

/// 姓は各単語の先頭を大文字にした形で照合される
#[test]
fn test_last_names_title_case() {
    let annotator = preset(PresetAnnotatorKind::LastNames);
    let anns = annotator.annotate("Ask Van Der Berg or O'neil, not Li.");
    assert_eq!(texts(&anns), vec!["Van Der Berg", "O'neil"]);
    assert!(annotator.annotate("ask van der berg").is_empty());
    assert!(!annotator.contains("Li"));
}

/// 複数のアノテーターの結果を優先度で統合する
#[test]
fn test_merge_by_priority() {
    let first = preset(PresetAnnotatorKind::FirstNames);
    let last = {
        let mut builder = AnnotatorBuilder::from_preset(PresetAnnotatorKind::LastNames)
            .priority(1)
            .unwrap();
        builder.load_reader(LAST_NAMES.as_bytes()).unwrap();
        builder.build().unwrap()
    };

    let text = "Hope Smith";
    let mut anns = first.annotate(text);
    anns.extend(last.annotate(text));
    assert_eq!(anns.len(), 3);

    let merged = longest_spans(anns);
    assert_eq!(texts(&merged), vec!["Hope", "Smith"]);
    assert_eq!(merged[0].annotator_type(), "first-names");
    assert_eq!(merged[1].annotator_type(), "last-names");
    assert_eq!(filter_by_type(&merged, "last-names").count(), 1);
    assert_eq!(concat_text(&merged, " "), "Hope Smith");
}

/// 挨拶はテキストの先頭にある場合のみ一致する
#[test]
fn test_salutations() {
    let annotator = preset(PresetAnnotatorKind::Salutations);
    assert_eq!(texts(&annotator.annotate("Hi Mark,")), vec!["Hi"]);
    assert_eq!(
        texts(&annotator.annotate("Good morning, team")),
        vec!["Good morning"]
    );
    assert!(annotator.annotate("Oh hi there").is_empty());
    assert!(annotator.annotate("Highlights").is_empty());
}

#[test]
fn test_valedictions() {
    let annotator = preset(PresetAnnotatorKind::Valedictions);
    assert_eq!(
        texts(&annotator.annotate("Best regards, Mark")),
        vec!["Best regards"]
    );
    assert_eq!(texts(&annotator.annotate("Thanks!")), vec!["Thanks"]);
    assert!(annotator.annotate("Many thanks").is_empty());
}

/// 区切りが妥当な位置に置いた登録表記は必ず見つかる
#[test]
fn test_containment() {
    let annotator = preset(PresetAnnotatorKind::FirstNames);
    for line in FIRST_NAMES.lines() {
        let Some((mention, _)) = line.split_once('\t') else {
            continue;
        };
        if mention.chars().count() < 3 {
            continue;
        }
        let text = format!("[x] ({mention}), y");
        let anns = annotator.annotate(&text);
        assert!(
            anns.iter().any(|a| a.text() == mention),
            "{mention}: {anns:?}"
        );
    }
}

/// 最長一致を有効にすると結果は重ならない
#[test]
fn test_longest_span_never_overlaps() {
    let mut builder = AnnotatorBuilder::new("misc").ignore_case(true);
    for m in ["new", "new york", "york", "york city", "new york city", "city"] {
        builder.add_mention::<&str>(m, &[]).unwrap();
    }
    let annotator = builder.build().unwrap();
    let anns = annotator.annotate("New York City, York and new city");
    for w in anns.windows(2) {
        assert!(!w[0].is_overlap(&w[1]));
        assert!(w[0].begin() < w[1].begin());
    }
    assert_eq!(texts(&anns), vec!["New York City", "York", "new", "city"]);
    assert_eq!(longest_spans(anns.clone()), anns);
}

/// ストップワードに一致する表記は登録されない
#[test]
fn test_stopwords() {
    let stopwords: Stopwords = ["will", "hope"].into_iter().collect();
    let mut builder = AnnotatorBuilder::from_preset(PresetAnnotatorKind::FirstNames)
        .stopwords(stopwords);
    builder.load_reader(FIRST_NAMES.as_bytes()).unwrap();
    let annotator = builder.build().unwrap();
    assert_eq!(annotator.num_mentions(), 6);
    assert!(annotator.annotate("I will hope").is_empty());
}

/// 部分区間の中を探した結果は親テキスト上のオフセットで返る
#[test]
fn test_annotate_within_sub_annotation() {
    let salutations = preset(PresetAnnotatorKind::Salutations);
    let first = preset(PresetAnnotatorKind::FirstNames);

    let body = Annotation::new("Hello all.\nDear Mary, see below.", 0);
    let line = body.sub_annotation(11, 21).unwrap();
    assert_eq!(line.text(), "Dear Mary,");

    let greeting = salutations.annotate_within(&line);
    assert_eq!(greeting.len(), 1);
    assert_eq!(greeting[0].range(), 11..15);

    let names = first.annotate_within(&line);
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].range(), 16..20);
    assert_eq!(names[0].text(), "Mary");
}
