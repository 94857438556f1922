/// Preparation time as an explicit tri-state: emission of the `time`
/// header line is gated on the field having been touched, not on its
/// value. A default shown to the user but never confirmed stays `Unset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeSetting {
    #[default]
    Unset,
    Set(u32),
}

impl TimeSetting {
    pub fn is_set(self) -> bool {
        matches!(self, TimeSetting::Set(_))
    }

    pub fn minutes(self) -> Option<u32> {
        match self {
            TimeSetting::Unset => None,
            TimeSetting::Set(minutes) => Some(minutes),
        }
    }
}

/// Recipe metadata destined for the `>>` header lines.
#[derive(Debug, Clone, Default)]
pub struct RecipeMetadata {
    pub source: Option<String>,
    pub time: TimeSetting,
    pub course: Option<String>,
}

impl RecipeMetadata {
    /// Build the header block: `source`, `time`, `course` in that fixed
    /// order, each line only when its value is present. Source and course
    /// require more than one character; the course line carries the blank
    /// line that separates the header from the body.
    pub fn header(&self) -> String {
        let mut header = String::new();

        if let Some(source) = &self.source {
            if source.chars().count() > 1 {
                header.push_str(&format!(">> source: {source}\n"));
            }
        }

        if let TimeSetting::Set(minutes) = self.time {
            header.push_str(&format!(">> time: {minutes} min\n"));
        }

        if let Some(course) = &self.course {
            if course.chars().count() > 1 {
                header.push_str(&format!(">> course: {course}\n\n"));
            }
        }

        header
    }
}
