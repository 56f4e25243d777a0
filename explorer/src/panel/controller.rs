//! Single-writer owner of panel state

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use super::frontend::HELP;
use super::{Action, PanelEvent};
use crate::config::PanelConfig;
use crate::editor::EditorRemote;
use crate::error::{ExplorerError, ExplorerResult};
use crate::fileops;

pub struct PanelController<W: Write> {
    editor: Arc<dyn EditorRemote>,
    root: PathBuf,
    title: String,
    visible: bool,
    clipboard: Vec<PathBuf>,
    show_hidden: bool,
    out: W,
}

impl<W: Write> PanelController<W> {
    /// Resolve the root from the editor and build the panel.
    ///
    /// An unreachable editor is returned as an error; there is no fallback
    /// root, since a panel rooted elsewhere would not match the editor.
    pub async fn start(
        editor: Arc<dyn EditorRemote>,
        config: &PanelConfig,
        out: W,
    ) -> ExplorerResult<Self> {
        let root = editor.get_working_directory().await?;
        if !root.is_dir() {
            return Err(ExplorerError::NotFound(root));
        }
        let title = editor.server_name().to_string();

        Ok(Self {
            editor,
            root,
            title,
            visible: true,
            clipboard: Vec::new(),
            show_hidden: config.show_hidden,
            out,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn clipboard(&self) -> &[PathBuf] {
        &self.clipboard
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consume events until `Shutdown` or until every sender is gone.
    pub async fn run(mut self, mut events: mpsc::Receiver<PanelEvent>) -> W {
        self.emit(&format!("[{}] {}", self.title, self.root.display()));
        while let Some(event) = events.recv().await {
            if !self.handle(event).await {
                break;
            }
        }
        tracing::info!("Panel '{}' stopped", self.title);
        self.out
    }

    /// Apply one event. Returns `false` when the loop should stop.
    pub async fn handle(&mut self, event: PanelEvent) -> bool {
        match event {
            PanelEvent::Toggle => {
                self.visible = !self.visible;
                let state = if self.visible { "shown" } else { "hidden" };
                tracing::info!("Panel '{}' {}", self.title, state);
                self.emit(&format!("[{}] panel {}", self.title, state));
            }
            PanelEvent::Hide => {
                if self.visible {
                    self.visible = false;
                    self.emit(&format!("[{}] panel hidden", self.title));
                }
            }
            PanelEvent::Command(action) => {
                if let Err(e) = self.perform(action).await {
                    self.report(&e);
                }
            }
            PanelEvent::Rejected(message) => self.emit(&message),
            PanelEvent::Shutdown => return false,
        }
        true
    }

    async fn perform(&mut self, action: Action) -> ExplorerResult<()> {
        match action {
            Action::Open(path) => {
                let path = self.resolve(&path);
                self.open(&path).await
            }
            Action::NewFolder { entry, name } => {
                let parent = self.enclosing(&entry)?;
                let created = fileops::create_dir(&parent, &name)?;
                self.emit(&format!("created {}/", created.display()));
                Ok(())
            }
            Action::NewFile { entry, name } => {
                let parent = self.enclosing(&entry)?;
                let created = fileops::create_file(&parent, &name)?;
                self.emit(&format!("created {}", created.display()));
                Ok(())
            }
            Action::Rename { entry, name } => {
                let old = self.resolve(&entry);
                if old.symlink_metadata().is_err() {
                    return Err(ExplorerError::NotFound(old));
                }
                let new_path = fileops::rename(&old, &name)?;
                self.emit(&format!("renamed {} -> {}", old.display(), new_path.display()));
                Ok(())
            }
            Action::Copy(paths) => {
                self.clipboard = paths.iter().map(|p| self.resolve(p)).collect();
                self.emit(&format!("copied {} path(s)", self.clipboard.len()));
                Ok(())
            }
            Action::Paste(entry) => self.paste(&entry),
            Action::List(entry) => self.list(entry.as_deref()),
            Action::Status => {
                let lines = [
                    format!("server:    {}", self.title),
                    format!("root:      {}", self.root.display()),
                    format!("visible:   {}", self.visible),
                    format!("clipboard: {} path(s)", self.clipboard.len()),
                ];
                for line in lines {
                    self.emit(&line);
                }
                Ok(())
            }
            Action::Help => {
                self.emit(HELP);
                Ok(())
            }
        }
    }

    /// Only regular files are sent to the editor; directories are a no-op.
    async fn open(&mut self, path: &Path) -> ExplorerResult<()> {
        if path.is_file() {
            self.editor.open_path(path).await?;
            self.emit(&format!("opened {}", path.display()));
        } else if path.is_dir() {
            tracing::debug!("Not opening directory {}", path.display());
        } else {
            return Err(ExplorerError::NotFound(path.to_path_buf()));
        }
        Ok(())
    }

    fn paste(&mut self, entry: &Path) -> ExplorerResult<()> {
        if self.clipboard.is_empty() {
            self.emit("clipboard is empty");
            return Ok(());
        }
        let dest_dir = self.enclosing(entry)?;
        for src in self.clipboard.clone() {
            match fileops::copy_into(&src, &dest_dir) {
                Ok(dest) => self.emit(&format!("pasted {} -> {}", src.display(), dest.display())),
                Err(e) => self.report(&e),
            }
        }
        Ok(())
    }

    fn list(&mut self, entry: Option<&Path>) -> ExplorerResult<()> {
        if !self.visible {
            self.emit(&format!("[{}] panel is hidden", self.title));
            return Ok(());
        }
        let dir = match entry {
            Some(e) => self.enclosing(e)?,
            None => self.root.clone(),
        };

        let mut entries: Vec<(bool, String)> = std::fs::read_dir(&dir)?
            .filter_map(|e| e.ok())
            .map(|e| {
                let is_dir = e.path().is_dir();
                (is_dir, e.file_name().to_string_lossy().into_owned())
            })
            .filter(|(_, name)| self.show_hidden || !name.starts_with('.'))
            .collect();
        // Directories first, then by name
        entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        self.emit(&format!("{}/", dir.display()));
        for (is_dir, name) in entries {
            let suffix = if is_dir { "/" } else { "" };
            self.emit(&format!("  {}{}", name, suffix));
        }
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn enclosing(&self, entry: &Path) -> ExplorerResult<PathBuf> {
        let path = self.resolve(entry);
        fileops::find_enclosing_dir(&path).ok_or(ExplorerError::NotFound(path))
    }

    fn report(&mut self, err: &ExplorerError) {
        match err {
            ExplorerError::DestinationExists(_) | ExplorerError::InvalidName(_) => {
                tracing::warn!("{}", err)
            }
            _ => tracing::error!("{}", err),
        }
        self.emit(&format!("error: {}", err));
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write panel output: {}", e);
        }
    }
}
