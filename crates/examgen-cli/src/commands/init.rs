//! The `examgen init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create examgen.toml
    if std::path::Path::new("examgen.toml").exists() {
        println!("examgen.toml already exists, skipping.");
    } else {
        std::fs::write("examgen.toml", SAMPLE_CONFIG)?;
        println!("Created examgen.toml");
    }

    // Create example question bank
    std::fs::create_dir_all("question-banks")?;
    let example_path = std::path::Path::new("question-banks/example.toml");
    if example_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add your questions to question-banks/example.toml");
    println!("  2. Run: examgen validate --bank question-banks/example.toml");
    println!("  3. Run: examgen generate --bank question-banks/example.toml --template quiz");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examgen configuration

randomize = false
# seed = "${EXAMGEN_TERM}"
tie_break = "pool-order"
output_dir = "./examgen-results"

[templates.quiz]
description = "Short weekly quiz"

[templates.quiz.distribution.MULTIPLE_CHOICE]
EASY = 4

[templates.quiz.distribution.TRUE_FALSE]
EASY = 2

[templates.quiz.distribution.ESSAY]
HARD = 1

[templates.midterm]
description = "Midterm covering every question type"

[templates.midterm.distribution.MULTIPLE_CHOICE]
EASY = 5
MEDIUM = 3

[templates.midterm.distribution.TRUE_FALSE]
EASY = 4

[templates.midterm.distribution.SHORT_ANSWER]
MEDIUM = 2

[templates.midterm.distribution.ESSAY]
HARD = 2
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Bank"
description = "A small question bank to get started"

[[questions]]
id = "mc-01"
question_type = "MULTIPLE_CHOICE"
difficulty = "EASY"
bloom_level = "REMEMBER"
points = 1

[[questions]]
id = "mc-02"
question_type = "MULTIPLE_CHOICE"
difficulty = "EASY"
bloom_level = "REMEMBER"
points = 1

[[questions]]
id = "mc-03"
question_type = "MULTIPLE_CHOICE"
difficulty = "EASY"
bloom_level = "REMEMBER"
points = 1

[[questions]]
id = "mc-04"
question_type = "MULTIPLE_CHOICE"
difficulty = "EASY"
bloom_level = "REMEMBER"
points = 1

[[questions]]
id = "mc-05"
question_type = "MULTIPLE_CHOICE"
difficulty = "EASY"
bloom_level = "REMEMBER"
points = 1

[[questions]]
id = "mc-06"
question_type = "MULTIPLE_CHOICE"
difficulty = "EASY"
bloom_level = "REMEMBER"
points = 1

[[questions]]
id = "mc-med-01"
question_type = "MULTIPLE_CHOICE"
difficulty = "MEDIUM"
bloom_level = "UNDERSTAND"
points = 2

[[questions]]
id = "mc-med-02"
question_type = "MULTIPLE_CHOICE"
difficulty = "MEDIUM"
bloom_level = "UNDERSTAND"
points = 2

[[questions]]
id = "mc-med-03"
question_type = "MULTIPLE_CHOICE"
difficulty = "MEDIUM"
bloom_level = "UNDERSTAND"
points = 2

[[questions]]
id = "tf-01"
question_type = "TRUE_FALSE"
difficulty = "EASY"
bloom_level = "REMEMBER"
points = 1

[[questions]]
id = "tf-02"
question_type = "TRUE_FALSE"
difficulty = "EASY"
bloom_level = "REMEMBER"
points = 1

[[questions]]
id = "tf-03"
question_type = "TRUE_FALSE"
difficulty = "EASY"
bloom_level = "REMEMBER"
points = 1

[[questions]]
id = "tf-04"
question_type = "TRUE_FALSE"
difficulty = "EASY"
bloom_level = "REMEMBER"
points = 1

[[questions]]
id = "sa-01"
question_type = "SHORT_ANSWER"
difficulty = "MEDIUM"
bloom_level = "APPLY"
points = 3

[[questions]]
id = "sa-02"
question_type = "SHORT_ANSWER"
difficulty = "MEDIUM"
bloom_level = "APPLY"
points = 3

[[questions]]
id = "essay-01"
question_type = "ESSAY"
difficulty = "HARD"
bloom_level = "EVALUATE"
points = 10

[[questions]]
id = "essay-02"
question_type = "ESSAY"
difficulty = "HARD"
bloom_level = "EVALUATE"
points = 10
"#;
