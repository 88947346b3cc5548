use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub name: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub idx: fn(&str) -> String,
    pub place: fn(&str) -> String,
    pub points: fn(&str) -> String,
    pub distance: fn(&str) -> String,
    pub muted: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "default" | "" => Self::default_theme(),
            "sunset" => Self::sunset(),
            "plain" => Self::plain(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::default_theme() // Fallback to default
            }
        }
    }

    fn default_theme() -> Self {
        Self {
            title: |s| s.bright_magenta().bold().underline().to_string(),
            name: |s| s.bright_white().bold().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.bright_white().to_string(),
            place: |s| s.cyan().italic().to_string(),
            points: |s| s.yellow().bold().to_string(),
            distance: |s| s.green().to_string(),
            muted: |s| s.bright_white().dimmed().italic().to_string(),
        }
    }

    fn sunset() -> Self {
        Self {
            title: |s| s.red().italic().bold().underline().to_string(),
            name: |s| s.bright_yellow().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.bright_white().to_string(),
            place: |s| s.magenta().italic().to_string(),
            points: |s| s.bright_red().bold().to_string(),
            distance: |s| s.yellow().to_string(),
            muted: |s| s.bright_yellow().dimmed().italic().to_string(),
        }
    }

    fn plain() -> Self {
        Self {
            title: |s| s.to_string(),
            name: |s| s.to_string(),
            line: |s| s.to_string(),
            idx: |s| s.to_string(),
            place: |s| s.to_string(),
            points: |s| s.to_string(),
            distance: |s| s.to_string(),
            muted: |s| s.to_string(),
        }
    }
}
