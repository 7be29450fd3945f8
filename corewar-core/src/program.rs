//! Program - the already-parsed warrior handed to the kernel

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::error::{CoreError, Result};
use crate::instruction::Instruction;

/// A resolved warrior program
///
/// Produced by an external Redcode parser; the kernel never sees source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    pub instructions: Vec<Instruction>,
    /// Entry point, relative to the first instruction
    #[serde(default)]
    pub start: usize,
}

impl Program {
    pub fn new(name: impl Into<String>, instructions: Vec<Instruction>) -> Self {
        Self {
            name: name.into(),
            author: None,
            strategy: None,
            instructions,
            start: 0,
        }
    }

    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Check the program against the environment limits
    pub fn validate(&self, env: &Environment) -> Result<()> {
        if self.instructions.is_empty() {
            return Err(CoreError::EmptyProgram(self.name.clone()));
        }
        if self.instructions.len() > env.max_length {
            return Err(CoreError::ProgramTooLong {
                name: self.name.clone(),
                len: self.instructions.len(),
                max: env.max_length,
            });
        }
        if self.instructions.len() > env.core_size {
            return Err(CoreError::ProgramTooLarge {
                name: self.name.clone(),
                core_size: env.core_size,
            });
        }
        if self.start >= self.instructions.len() {
            return Err(CoreError::StartOutOfRange {
                name: self.name.clone(),
                start: self.start,
                len: self.instructions.len(),
            });
        }
        Ok(())
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Anything that can produce a validated program for an environment
pub trait ProgramSource {
    fn program(&self, env: &Environment) -> Result<Program>;
}

impl ProgramSource for Program {
    fn program(&self, env: &Environment) -> Result<Program> {
        self.validate(env)?;
        Ok(self.clone())
    }
}

impl ProgramSource for Path {
    fn program(&self, env: &Environment) -> Result<Program> {
        let program = Program::load(self)?;
        program.validate(env)?;
        Ok(program)
    }
}
