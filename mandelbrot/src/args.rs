use std::env;
use std::str::FromStr;
use text_colorizer::Colorize;

/// Which outputs to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Image,
    Gif,
    Both,
}

impl Mode {
    pub fn writes_image(self) -> bool {
        matches!(self, Mode::Image | Mode::Both)
    }

    pub fn writes_animation(self) -> bool {
        matches!(self, Mode::Gif | Mode::Both)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" | "1" => Ok(Mode::Image),
            "gif" | "2" => Ok(Mode::Gif),
            "both" | "3" => Ok(Mode::Both),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

#[derive(Debug)]
pub struct Arguments {
    pub mode: Mode,
    pub config: String,
}

fn usage() {
    eprintln!(
        "Usage: {} {} {}",
        "mandelbrot".green(),
        "<image|gif|both>".yellow(),
        "[config.toml]".blue()
    );
}

pub fn parse_args() -> Arguments {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.len() > 2 {
        eprintln!("{} - wrong number of arguments", "mandelbrot".green());
        usage();
        std::process::exit(1);
    }

    let mode = match args[0].parse() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("{} - {}", "mandelbrot".green(), e);
            usage();
            std::process::exit(1);
        }
    };

    Arguments {
        mode,
        config: args.get(1).cloned().unwrap_or_else(|| "config.toml".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_parse_by_name_and_number() {
        assert_eq!("image".parse::<Mode>().unwrap(), Mode::Image);
        assert_eq!("2".parse::<Mode>().unwrap(), Mode::Gif);
        assert_eq!("both".parse::<Mode>().unwrap(), Mode::Both);
        assert!("png".parse::<Mode>().is_err());
    }

    #[test]
    fn both_writes_everything() {
        assert!(Mode::Both.writes_image() && Mode::Both.writes_animation());
        assert!(!Mode::Image.writes_animation());
        assert!(!Mode::Gif.writes_image());
    }
}
