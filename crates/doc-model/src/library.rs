//! Virtual folder tree used to organize documents.
//!
//! Folders and files live in id-keyed maps and refer to their parent by id, so
//! moving an entry only rewrites one field and never aliases live objects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FolderId(pub u64);

impl FolderId {
    pub const ROOT: FolderId = FolderId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    Pdf,
    Other,
}

impl FileKind {
    pub fn from_uri(uri: &str) -> Self {
        let lower = uri.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            FileKind::Pdf
        } else {
            FileKind::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub parent: Option<FolderId>,
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: FileId,
    pub name: String,
    pub uri: String,
    pub kind: FileKind,
    pub folder: FolderId,
    pub added_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
    Newest,
    Oldest,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error("no folder with id {0}")]
    UnknownFolder(u64),
    #[error("no file with id {0}")]
    UnknownFile(u64),
    #[error("name must not be empty")]
    EmptyName,
    #[error("a folder named {0:?} already exists here")]
    DuplicateName(String),
    #[error("the root folder cannot be renamed, moved or deleted")]
    RootImmutable,
    #[error("cannot move a folder into itself or one of its subfolders")]
    Cycle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryAction {
    CreateFolder { parent: FolderId, name: String },
    RenameFolder { folder: FolderId, name: String },
    DeleteFolder { folder: FolderId },
    MoveFolder { folder: FolderId, to: FolderId },
    AddFile { folder: FolderId, name: String, uri: String },
    RenameFile { file: FileId, name: String },
    RemoveFile { file: FileId },
    MoveFile { file: FileId, to: FolderId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryOutcome {
    FolderCreated(FolderId),
    FileAdded(FileId),
    Removed { folders: usize, files: usize },
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryTree {
    folders: BTreeMap<FolderId, Folder>,
    files: BTreeMap<FileId, FileEntry>,
    next_folder_id: u64,
    next_file_id: u64,
}

impl Default for LibraryTree {
    fn default() -> Self {
        let root = Folder {
            id: FolderId::ROOT,
            name: "Documents".to_owned(),
            parent: None,
            created_at: now(),
        };
        Self {
            folders: BTreeMap::from([(FolderId::ROOT, root)]),
            files: BTreeMap::new(),
            next_folder_id: 0,
            next_file_id: 0,
        }
    }
}

impl LibraryTree {
    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.get(&id)
    }

    pub fn file(&self, id: FileId) -> Option<&FileEntry> {
        self.files.get(&id)
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Direct subfolders, sorted by name; the root is never anyone's child
    pub fn children(&self, folder: FolderId) -> Vec<&Folder> {
        let mut children: Vec<&Folder> = self
            .folders
            .values()
            .filter(|candidate| candidate.id != FolderId::ROOT && candidate.parent == Some(folder))
            .collect();
        children.sort_by_key(|child| child.name.to_lowercase());
        children
    }

    pub fn files_in(&self, folder: FolderId, order: SortOrder) -> Vec<&FileEntry> {
        let mut files: Vec<&FileEntry> =
            self.files.values().filter(|file| file.folder == folder).collect();
        match order {
            SortOrder::NameAsc => files.sort_by_key(|file| file.name.to_lowercase()),
            SortOrder::NameDesc => {
                files.sort_by_key(|file| std::cmp::Reverse(file.name.to_lowercase()))
            }
            SortOrder::Newest => {
                files.sort_by_key(|file| std::cmp::Reverse((file.added_at, file.id)))
            }
            SortOrder::Oldest => files.sort_by_key(|file| (file.added_at, file.id)),
        }
        files
    }

    /// Folder names from the root down to `folder`, inclusive
    ///
    /// `None` when the parent chain is broken or loops without reaching the root.
    pub fn path_of(&self, folder: FolderId) -> Option<Vec<&str>> {
        let mut names = Vec::new();
        let mut cursor = Some(folder);
        while let Some(id) = cursor {
            if names.len() >= self.folders.len() {
                log::warn!("folder {} has a cyclic parent chain", folder.0);
                return None;
            }
            let current = self.folders.get(&id)?;
            names.push(current.name.as_str());
            cursor = current.parent.filter(|_| id != FolderId::ROOT);
        }
        names.reverse();
        Some(names)
    }

    pub fn find_by_uri(&self, uri: &str) -> Option<&FileEntry> {
        self.files.values().find(|file| file.uri == uri)
    }

    fn new_folder_id(&mut self) -> FolderId {
        self.next_folder_id += 1;
        FolderId(self.next_folder_id)
    }

    fn new_file_id(&mut self) -> FileId {
        self.next_file_id += 1;
        FileId(self.next_file_id)
    }

    fn require_folder(&self, id: FolderId) -> Result<&Folder, LibraryError> {
        self.folders.get(&id).ok_or(LibraryError::UnknownFolder(id.0))
    }

    fn require_file_mut(&mut self, id: FileId) -> Result<&mut FileEntry, LibraryError> {
        self.files.get_mut(&id).ok_or(LibraryError::UnknownFile(id.0))
    }

    fn ensure_unique_name(
        &self,
        parent: FolderId,
        name: &str,
        except: Option<FolderId>,
    ) -> Result<(), LibraryError> {
        let lowered = name.to_lowercase();
        let taken = self.folders.values().any(|folder| {
            folder.parent == Some(parent)
                && Some(folder.id) != except
                && folder.name.to_lowercase() == lowered
        });
        if taken {
            return Err(LibraryError::DuplicateName(name.to_owned()));
        }
        Ok(())
    }

    /// Whether `folder` is `ancestor` or lies beneath it
    ///
    /// The walk stops at the root and after visiting every folder once, so a
    /// looping parent chain answers `false`.
    fn is_within(&self, folder: FolderId, ancestor: FolderId) -> bool {
        let mut cursor = Some(folder);
        for _ in 0..=self.folders.len() {
            let Some(id) = cursor else {
                return false;
            };
            if id == ancestor {
                return true;
            }
            if id == FolderId::ROOT {
                return false;
            }
            cursor = self.folders.get(&id).and_then(|current| current.parent);
        }
        false
    }
}

pub fn apply_library_action(
    tree: &mut LibraryTree,
    action: LibraryAction,
) -> Result<LibraryOutcome, LibraryError> {
    match action {
        LibraryAction::CreateFolder { parent, name } => {
            let name = clean_name(&name)?;
            tree.require_folder(parent)?;
            tree.ensure_unique_name(parent, &name, None)?;

            let id = tree.new_folder_id();
            tree.folders.insert(id, Folder { id, name, parent: Some(parent), created_at: now() });
            Ok(LibraryOutcome::FolderCreated(id))
        }
        LibraryAction::RenameFolder { folder, name } => {
            if folder == FolderId::ROOT {
                return Err(LibraryError::RootImmutable);
            }
            let name = clean_name(&name)?;
            let parent = tree.require_folder(folder)?.parent.unwrap_or(FolderId::ROOT);
            tree.ensure_unique_name(parent, &name, Some(folder))?;

            if let Some(entry) = tree.folders.get_mut(&folder) {
                entry.name = name;
            }
            Ok(LibraryOutcome::Updated)
        }
        LibraryAction::DeleteFolder { folder } => {
            if folder == FolderId::ROOT {
                return Err(LibraryError::RootImmutable);
            }
            tree.require_folder(folder)?;

            let doomed: Vec<FolderId> =
                tree.folders.keys().copied().filter(|&id| tree.is_within(id, folder)).collect();
            let files_before = tree.files.len();
            tree.files.retain(|_, file| !doomed.contains(&file.folder));
            for id in &doomed {
                tree.folders.remove(id);
            }

            let files = files_before - tree.files.len();
            Ok(LibraryOutcome::Removed { folders: doomed.len(), files })
        }
        LibraryAction::MoveFolder { folder, to } => {
            if folder == FolderId::ROOT {
                return Err(LibraryError::RootImmutable);
            }
            let name = tree.require_folder(folder)?.name.clone();
            tree.require_folder(to)?;
            if tree.is_within(to, folder) {
                return Err(LibraryError::Cycle);
            }
            tree.ensure_unique_name(to, &name, Some(folder))?;

            if let Some(entry) = tree.folders.get_mut(&folder) {
                entry.parent = Some(to);
            }
            Ok(LibraryOutcome::Updated)
        }
        LibraryAction::AddFile { folder, name, uri } => {
            let name = clean_name(&name)?;
            tree.require_folder(folder)?;

            let id = tree.new_file_id();
            let kind = FileKind::from_uri(&uri);
            tree.files.insert(id, FileEntry { id, name, uri, kind, folder, added_at: now() });
            Ok(LibraryOutcome::FileAdded(id))
        }
        LibraryAction::RenameFile { file, name } => {
            let name = clean_name(&name)?;
            tree.require_file_mut(file)?.name = name;
            Ok(LibraryOutcome::Updated)
        }
        LibraryAction::RemoveFile { file } => {
            tree.files.remove(&file).ok_or(LibraryError::UnknownFile(file.0))?;
            Ok(LibraryOutcome::Removed { folders: 0, files: 1 })
        }
        LibraryAction::MoveFile { file, to } => {
            tree.require_folder(to)?;
            tree.require_file_mut(file)?.folder = to;
            Ok(LibraryOutcome::Updated)
        }
    }
}

fn clean_name(name: &str) -> Result<String, LibraryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::EmptyName);
    }
    Ok(trimmed.to_owned())
}

fn now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}
