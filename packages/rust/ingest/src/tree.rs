//! In-memory directory tree of the files kept by an ingestion run.
//!
//! Directories are created lazily when the first file below them is
//! inserted, so a directory with no surviving files never appears.

/// Body of a collected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBody {
    /// Decoded UTF-8 text.
    Text(String),
    /// Binary or otherwise undecodable content.
    NonText,
}

/// A file kept by the walk.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// Final path component.
    pub name: String,
    /// `/`-separated path relative to the ingestion root.
    pub rel_path: String,
    /// Size on disk in bytes.
    pub size: u64,
    pub body: FileBody,
}

/// A directory and its (non-empty) children.
#[derive(Debug, Clone, Default)]
pub struct DirNode {
    pub name: String,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone)]
pub enum Node {
    File(FileNode),
    Dir(DirNode),
}

impl Node {
    fn name(&self) -> &str {
        match self {
            Node::File(f) => &f.name,
            Node::Dir(d) => &d.name,
        }
    }

    /// Sort bucket: README first, then files, hidden files, dirs, hidden dirs.
    fn rank(&self) -> u8 {
        let hidden = self.name().starts_with('.');
        match self {
            Node::File(f) if f.name.eq_ignore_ascii_case("readme.md") => 0,
            Node::File(_) if !hidden => 1,
            Node::File(_) => 2,
            Node::Dir(_) if !hidden => 3,
            Node::Dir(_) => 4,
        }
    }
}

impl DirNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Insert `file` below this directory, following `parents` (the
    /// directory components between here and the file).
    pub fn insert(&mut self, parents: &[&str], file: FileNode) {
        let Some((first, rest)) = parents.split_first() else {
            self.children.push(Node::File(file));
            return;
        };

        let existing = self.children.iter().position(|child| {
            matches!(child, Node::Dir(d) if d.name == *first)
        });

        let idx = match existing {
            Some(idx) => idx,
            None => {
                self.children.push(Node::Dir(DirNode::new(*first)));
                self.children.len() - 1
            }
        };

        if let Node::Dir(dir) = &mut self.children[idx] {
            dir.insert(rest, file);
        }
    }

    /// Recursively order children for display.
    pub fn sort(&mut self) {
        self.children
            .sort_by_cached_key(|child| (child.rank(), child.name().to_lowercase()));
        for child in &mut self.children {
            if let Node::Dir(dir) = child {
                dir.sort();
            }
        }
    }

    /// All files in display order (depth-first).
    pub fn files(&self) -> Vec<&FileNode> {
        let mut out = Vec::new();
        self.collect_files(&mut out);
        out
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a FileNode>) {
        for child in &self.children {
            match child {
                Node::File(f) => out.push(f),
                Node::Dir(d) => d.collect_files(out),
            }
        }
    }

    /// Render as a box-drawing tree with this directory as the single root.
    pub fn render(&self) -> String {
        let mut out = String::from("Directory structure:\n");
        out.push_str(&format!("└── {}/\n", self.name));
        self.render_children("    ", &mut out);
        out
    }

    fn render_children(&self, prefix: &str, out: &mut String) {
        let count = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            let last = i + 1 == count;
            let connector = if last { "└── " } else { "├── " };
            match child {
                Node::File(f) => {
                    out.push_str(&format!("{prefix}{connector}{}\n", f.name));
                }
                Node::Dir(d) => {
                    out.push_str(&format!("{prefix}{connector}{}/\n", d.name));
                    let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
                    d.render_children(&child_prefix, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(rel: &str) -> FileNode {
        FileNode {
            name: rel.rsplit('/').next().unwrap().to_string(),
            rel_path: rel.to_string(),
            size: 1,
            body: FileBody::Text("x".into()),
        }
    }

    fn build(paths: &[&str]) -> DirNode {
        let mut root = DirNode::new("repo");
        for rel in paths {
            let parts: Vec<&str> = rel.split('/').collect();
            root.insert(&parts[..parts.len() - 1], file(rel));
        }
        root.sort();
        root
    }

    #[test]
    fn readme_first_then_files_then_dirs() {
        let root = build(&["src/main.rs", ".env.example", "b.txt", "README.md", ".github/ci.yml", "A.txt"]);
        let order: Vec<&str> = root.files().iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(
            order,
            vec!["README.md", "A.txt", "b.txt", ".env.example", "src/main.rs", ".github/ci.yml"]
        );
    }

    #[test]
    fn render_draws_connectors() {
        let root = build(&["a.txt", "src/lib.rs", "src/util/mod.rs"]);
        let expected = "\
Directory structure:
└── repo/
    ├── a.txt
    └── src/
        ├── lib.rs
        └── util/
            └── mod.rs
";
        assert_eq!(root.render(), expected);
    }

    #[test]
    fn shared_parent_directories_are_reused() {
        let root = build(&["docs/a.md", "docs/b.md"]);
        assert_eq!(root.children.len(), 1);
        match &root.children[0] {
            Node::Dir(d) => assert_eq!(d.children.len(), 2),
            Node::File(_) => panic!("expected a directory"),
        }
    }

    #[test]
    fn pipes_continue_under_non_last_dirs() {
        let root = build(&["a/x.txt", "b/y.txt"]);
        let rendered = root.render();
        assert!(rendered.contains("    ├── a/\n    │   └── x.txt\n"));
        assert!(rendered.contains("    └── b/\n        └── y.txt\n"));
    }
}
