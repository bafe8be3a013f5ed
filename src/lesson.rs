use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;

use crate::error::LessonError;

static LESSON_DIR: Dir = include_dir!("src/lessons");

/// A named, ordered set of practice lines
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "RawLesson")]
pub struct Lesson {
    name: String,
    lines: Vec<String>,
}

#[derive(Deserialize)]
struct RawLesson {
    name: String,
    lines: Vec<String>,
}

impl TryFrom<RawLesson> for Lesson {
    type Error = LessonError;

    fn try_from(raw: RawLesson) -> Result<Self, Self::Error> {
        Lesson::new(raw.name, raw.lines)
    }
}

impl Lesson {
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Result<Self, LessonError> {
        let name = name.into();
        if lines.is_empty() {
            return Err(LessonError::Empty(name));
        }
        Ok(Self { name, lines })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Load the lessons bundled into the binary, ordered by file name
pub fn builtin_lessons() -> Result<Vec<Lesson>, LessonError> {
    let mut files: Vec<_> = LESSON_DIR
        .files()
        .filter(|f| f.path().extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort_by(|a, b| a.path().cmp(b.path()));

    files
        .into_iter()
        .map(|file| {
            let file_name = file.path().display().to_string();
            let contents = file
                .contents_utf8()
                .ok_or_else(|| LessonError::Unreadable(file_name.clone()))?;
            from_str::<Lesson>(contents).map_err(|source| LessonError::Parse {
                file: file_name,
                source,
            })
        })
        .collect()
}
