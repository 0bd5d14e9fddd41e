//! The `quizgrade init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizgrade.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("quiz_data")?;
    for (name, content) in [
        ("quiz_data/theory_ds_1.1_3.json", DECISION_TREES_QUIZ),
        ("quiz_data/theory_ds_1.1_4.1.json", KNN_BASICS_QUIZ),
        ("quiz_data/theory_ds_1.1_4.2.json", KNN_PRACTICE_QUIZ),
    ] {
        write_if_missing(Path::new(name), content)?;
    }

    write_if_missing(Path::new("answers-example.json"), EXAMPLE_ANSWERS)?;

    println!("\nNext steps:");
    println!("  1. Add quiz files to quiz_data/ and sections to quizgrade.toml");
    println!("  2. Run: quizgrade validate");
    println!("  3. Run: quizgrade grade --user <name> --slot 3 --answers answers-example.json");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizgrade configuration

data_dir = "quiz_data"
results_dir = "./quizgrade-results"
default_section = "Theory DS - 1.1"

[[sections]]
name = "Theory DS - 0"
description = "Fundamentals and prerequisites"
prefix = "theory_ds_0"
slots = [
    "1. Fundamentals",
    "2. Prerequisites",
    "3. Basic concepts",
    "4. Mathematical foundations",
    "5. Statistics basics",
    "6. Probability theory",
    "7. Linear algebra",
    "8. Calculus",
    "9. Optimization",
    "10. Data preprocessing",
    "11. Feature engineering",
    "12. Model evaluation",
    "13. Overfitting basics",
]

[[sections]]
name = "Theory DS - 1.1"
description = "Classic supervised algorithms"
prefix = "theory_ds_1.1"
slots = [
    "1. Basic understanding",
    "2. Linear models",
    "3. Decision Trees",
    "4. KNN",
    "5. LDA/QDA",
    "6. Dimensionality reduction",
    "7. Regularisation",
    "8. ML metrics",
    "9. Validation",
]

[[sections]]
name = "Theory DS - 1.2"
description = "Classic unsupervised algorithms"
prefix = "theory_ds_1.2"
slots = [
    "1. Unsupervised problems",
    "2. Clusterisation",
    "3. K-Means",
    "4. Hierarchical Clusterisation",
    "5. DBSCAN",
    "6. HDBSCAN",
    "7. GMM",
    "8. Dimensionality reduction",
    "9. PCA",
    "10. t-SNE",
    "11. UMAP",
    "12. Concept of auto-encoders",
    "13. Anomaly detection",
]

[[sections]]
name = "Theory DS - 2.1"
description = "Behind the scene"
prefix = "theory_ds_2.1"
"#;

const DECISION_TREES_QUIZ: &str = r#"{
  "quiz_title": "Decision Trees",
  "questions": [
    {
      "question_id": 1,
      "question_text": "Which impurity measure does CART use for classification by default?",
      "question_type": "single_choice",
      "options": ["Gini impurity", "Mean squared error", "Hinge loss"],
      "correct_answer": 0,
      "explanation": "CART chooses splits that minimise Gini impurity."
    },
    {
      "question_id": 2,
      "question_text": "Which settings limit overfitting of a single tree?",
      "question_type": "multiple_choice",
      "options": ["max_depth", "Adding more leaves", "min_samples_leaf", "Removing the test set"],
      "correct_answers": [0, 2],
      "explanation": "Both cap how finely the tree can partition the data."
    },
    {
      "question_id": 3,
      "question_text": "In your own words, what is information gain?",
      "question_type": "free_text",
      "explanation": "The drop in entropy achieved by a split."
    }
  ],
  "pdf_links": ["https://scikit-learn.org/stable/modules/tree.html"]
}
"#;

const KNN_BASICS_QUIZ: &str = r#"{
  "quiz_title": "KNN basics",
  "questions": [
    {
      "question_id": 1,
      "question_text": "Is k-nearest neighbours a parametric model?",
      "question_type": "single_choice",
      "options": ["Yes", "No"],
      "correct_answer": 1,
      "explanation": "KNN keeps the training set instead of fitting parameters."
    }
  ]
}
"#;

const KNN_PRACTICE_QUIZ: &str = r#"{
  "quiz_title": "KNN in practice",
  "questions": [
    {
      "question_id": 1,
      "question_text": "Why scale features before KNN?",
      "question_type": "single_choice",
      "options": ["Distances are dominated by large-range features", "It makes k smaller"],
      "correct_answer": 0,
      "explanation": "Unscaled features distort the distance metric."
    }
  ],
  "pdf_links": ["https://scikit-learn.org/stable/modules/neighbors.html"]
}
"#;

const EXAMPLE_ANSWERS: &str = r#"[
  [
    {"type": "single_choice", "answer": 1},
    {"type": "multiple_choice", "answer": [2, 0]},
    {"type": "free_text", "answer": "How much a split reduces uncertainty"}
  ]
]
"#;
