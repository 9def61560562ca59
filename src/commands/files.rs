use std::rc::Rc;

use async_trait::async_trait;

use crate::commands::{Command, CommandError};
use crate::config::FileEntry;
use crate::eval::{CommandContext, Output};

/// Read-only, flat set of files shown by `ls` and `cat`.
#[derive(Debug, Default)]
pub struct VirtualFs {
    files: Vec<FileEntry>,
}

impl VirtualFs {
    pub fn new(mut files: Vec<FileEntry>) -> Self {
        files.sort_by(|a, b| a.name.cmp(&b.name));
        files.dedup_by(|a, b| a.name == b.name);
        Self { files }
    }

    pub fn get(&self, name: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.name == name)
    }

    /// File names in sorted order; dotfiles only when `all`.
    pub fn names(&self, all: bool) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .map(|f| f.name.as_str())
            .filter(move |n| all || !n.starts_with('.'))
    }
}

/// `ls [-a]`
pub struct Ls {
    fs: Rc<VirtualFs>,
}

impl Ls {
    pub fn new(fs: Rc<VirtualFs>) -> Self {
        Self { fs }
    }
}

#[async_trait(?Send)]
impl Command for Ls {
    fn description(&self) -> &str {
        "List files"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<Output, CommandError> {
        let all = ctx.parsed.has_flag("a") || ctx.parsed.has_flag("all");
        Ok(Output::Text(self.fs.names(all).collect::<Vec<_>>().join("  ")))
    }
}

/// `cat <file>`
pub struct Cat {
    fs: Rc<VirtualFs>,
}

impl Cat {
    pub fn new(fs: Rc<VirtualFs>) -> Self {
        Self { fs }
    }
}

#[async_trait(?Send)]
impl Command for Cat {
    fn description(&self) -> &str {
        "Print a file"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<Output, CommandError> {
        let Some(path) = ctx.args().first() else {
            return Err(CommandError::MissingOperand {
                command: "cat",
                what: "file",
            });
        };
        // Tolerate `./name` and `~/name`; the tree is flat.
        let name = path
            .strip_prefix("./")
            .or_else(|| path.strip_prefix("~/"))
            .unwrap_or(path);
        match self.fs.get(name) {
            Some(file) => Ok(Output::Text(file.content.clone())),
            None => Err(CommandError::NoSuchFile {
                command: "cat",
                path: path.clone(),
            }),
        }
    }
}

/// `pwd`
pub struct Pwd {
    home: String,
}

impl Pwd {
    pub fn new(home: impl Into<String>) -> Self {
        Self { home: home.into() }
    }
}

#[async_trait(?Send)]
impl Command for Pwd {
    fn description(&self) -> &str {
        "Print working directory"
    }

    async fn execute(&self, _ctx: &mut CommandContext<'_>) -> Result<Output, CommandError> {
        Ok(Output::Text(self.home.clone()))
    }
}
