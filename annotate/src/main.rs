//! 辞書に基づいてテキストにアノテーションを付けるユーティリティ
//!
//! このバイナリは、標準入力から1行ずつテキストを読み込み、辞書に登録された
//! 表記を探して、指定された出力形式（debug、tsv、json）で結果を出力します。

use std::error::Error;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use lexica::{AnnotatorBuilder, PresetAnnotatorKind, Stopwords};

use clap::Parser;

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Debug,
    Tsv,
    Json,
}

impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "debug" => Ok(Self::Debug),
            "tsv" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "annotate", about = "Finds dictionary mentions in text")]
struct Args {
    /// Dictionary files. Can be given more than once.
    #[clap(short = 'd', long, required = true)]
    dict: Vec<PathBuf>,

    /// Preset settings. Choices are first-names, last-names, salutations, and valedictions.
    #[clap(short = 'p', long)]
    preset: Option<PresetAnnotatorKind>,

    /// Annotation type. Defaults to the preset name or the first dictionary's file name.
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// Matches case-insensitively.
    #[clap(long)]
    ignore_case: bool,

    /// Capitalizes every word of the dictionary entries.
    #[clap(long)]
    title_case: bool,

    /// Only reports matches at the beginning of a line.
    #[clap(long)]
    prefix_match: bool,

    /// Only reports matches at the end of a line.
    #[clap(long)]
    suffix_match: bool,

    /// Minimum number of characters of a dictionary entry.
    #[clap(short = 'm', long)]
    min_chars: Option<usize>,

    /// Priority of the dictionary entries (0 to 255, lower wins).
    #[clap(long)]
    priority: Option<u32>,

    /// Reports overlapping matches instead of the longest ones.
    #[clap(long)]
    all_spans: bool,

    /// Extra stopword list, one word per line. Added to the bundled English stopwords.
    #[clap(long, conflicts_with = "no_stopwords")]
    stopwords: Option<PathBuf>,

    /// Registers dictionary entries even if they are stopwords.
    #[clap(long)]
    no_stopwords: bool,

    /// Output mode. Choices are debug, tsv, and json.
    #[clap(short = 'O', long, default_value = "debug")]
    output_mode: OutputMode,
}

impl Args {
    fn builder(&self) -> Result<AnnotatorBuilder, Box<dyn Error>> {
        let mut builder = match self.preset {
            Some(kind) => AnnotatorBuilder::from_preset(kind),
            None => {
                let name = self
                    .dict
                    .first()
                    .and_then(|p| p.file_name())
                    .map_or_else(|| "annotation".into(), |n| n.to_string_lossy());
                AnnotatorBuilder::new(name)
            }
        };
        if let Some(name) = &self.name {
            builder = builder.annotator_type(name);
        }

        if self.ignore_case {
            builder = builder.ignore_case(true);
        }
        if self.title_case {
            builder = builder.title_case(true);
        }
        if self.prefix_match {
            builder = builder.prefix_match(true);
        }
        if self.suffix_match {
            builder = builder.suffix_match(true);
        }
        if let Some(min_chars) = self.min_chars {
            builder = builder.min_chars(min_chars);
        }
        if let Some(priority) = self.priority {
            builder = builder.priority(priority)?;
        }
        if self.all_spans {
            builder = builder.output_longest_span(false);
        }

        if self.no_stopwords {
            builder = builder.stopwords(Stopwords::new());
        } else if let Some(path) = &self.stopwords {
            let mut stopwords = Stopwords::english();
            stopwords.extend(Stopwords::from_path(path)?.iter());
            builder = builder.stopwords(stopwords);
        }
        Ok(builder)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut builder = args.builder()?;
    for path in &args.dict {
        builder.load_path(path)?;
    }
    let annotator = builder.build()?;
    log::info!(
        "Ready to annotate {} with {} mentions",
        annotator.annotator_type(),
        annotator.num_mentions()
    );

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let lines = std::io::stdin().lock().lines();
    for line in lines {
        let line = line?;
        let annotations = annotator.annotate(&line);
        match args.output_mode {
            OutputMode::Debug => {
                writeln!(&mut out, "Found {} annotation(s)", annotations.len())?;
                for (i, a) in annotations.iter().enumerate() {
                    writeln!(&mut out, "{}. {}", i + 1, a.debug_string())?;
                }
            }
            OutputMode::Tsv => {
                for a in &annotations {
                    writeln!(
                        &mut out,
                        "{}\t{}\t{}\t{}\t{}\t{}",
                        a.begin(),
                        a.end(),
                        a.annotator_type(),
                        a.text(),
                        a.priority(),
                        a.values().map(|v| v.join("|")).unwrap_or_default(),
                    )?;
                }
                out.write_all(b"EOS\n")?;
            }
            OutputMode::Json => {
                serde_json::to_writer(&mut out, &annotations)?;
                out.write_all(b"\n")?;
            }
        }
        if is_tty {
            out.flush()?;
        }
    }

    Ok(())
}
