use std::{
    fmt,
    path::PathBuf,
};

use crate::error::ConfigError;


#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Mode {
    Compress,
    Extract,
}

/// User provided settings.
#[derive(Clone, Debug)]
pub struct Config {
    pub mode:    Mode,
    pub level:   u32,
    pub input:   PathBuf,
    pub output:  PathBuf,
    pub quiet:   bool,
}
impl Config {
    /// Parse command line arguments (everything after the program name).
    pub fn new(args: &[String]) -> Result<Config, ConfigError> {
        let mut args = args.iter();

        let mode = match args.next().map(String::as_str) {
            Some("c") => Mode::Compress,
            Some("x") => Mode::Extract,
            Some(m)   => return Err(ConfigError::InvalidMode(m.to_string())),
            None      => return Err(ConfigError::InvalidMode(String::new())),
        };

        let mut level   = 5u32;
        let mut input   = None;
        let mut output  = None;
        let mut quiet   = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-mem" => {
                    let mem = args.next()
                        .ok_or_else(|| ConfigError::InvalidMemory(String::new()))?;
                    let mem: u64 = mem.parse()
                        .map_err(|_| ConfigError::InvalidMemory(mem.to_string()))?;
                    if mem > 9 {
                        return Err(ConfigError::OutOfRangeMemory(mem));
                    }
                    level = mem as u32;
                }
                "-q" => quiet = true,
                _ => {
                    if input.is_none() {
                        input = Some(PathBuf::from(arg));
                    }
                    else if output.is_none() {
                        output = Some(PathBuf::from(arg));
                    }
                    else {
                        return Err(ConfigError::InvalidInput(PathBuf::from(arg)));
                    }
                }
            }
        }

        let input = input.ok_or(ConfigError::MissingInput)?;
        if mode == Mode::Compress && !input.is_file() {
            return Err(ConfigError::InvalidInput(input));
        }
        let output = output.ok_or(ConfigError::MissingOutput)?;

        Ok(Config {
            mode, level, input, output, quiet,
        })
    }
}
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "=============================================================")?;
        writeln!(f, " {} {}",
            match self.mode {
                Mode::Compress => "Compressing",
                Mode::Extract  => "Extracting",
            },
            self.input.display()
        )?;
        writeln!(f, " Output: {}", self.output.display())?;
        if self.mode == Mode::Compress {
            writeln!(f, " Memory Option: {}", self.level)?;
        }
        writeln!(f, "=============================================================")
    }
}
