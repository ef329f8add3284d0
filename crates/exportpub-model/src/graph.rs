//! The whole-program declaration graph for one compilation unit.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::declaration::{ClassDecl, Declaration};
use crate::error::{ModelError, Result};
use crate::name::QualifiedName;

/// One compilation unit: its source files plus the classes it references
/// from dependencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleGraph {
    pub name: String,
    #[serde(default)]
    pub files: Vec<SourceFile>,
    /// Classes from other modules, available for lookup but never annotated.
    #[serde(default)]
    pub dependencies: Vec<ClassDecl>,
}

/// A source file and its top-level declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

/// Position of a declaration: a file index followed by child indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclPath {
    pub file: usize,
    pub indices: Vec<usize>,
}

impl DeclPath {
    /// Whether the declaration sits directly in its file.
    pub fn is_top_level(&self) -> bool {
        self.indices.len() == 1
    }

    fn child(&self, index: usize) -> DeclPath {
        let mut indices = self.indices.clone();
        indices.push(index);
        DeclPath {
            file: self.file,
            indices,
        }
    }
}

impl fmt::Display for DeclPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.file)?;
        for idx in &self.indices {
            write!(f, "/{idx}")?;
        }
        Ok(())
    }
}

/// Lookup table from qualified class name to declaration.
#[derive(Debug, Default)]
pub struct ClassIndex<'g> {
    classes: HashMap<&'g str, &'g ClassDecl>,
}

impl<'g> ClassIndex<'g> {
    pub fn get(&self, name: &QualifiedName) -> Option<&'g ClassDecl> {
        self.classes.get(name.as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn insert_recursive(&mut self, class: &'g ClassDecl) {
        self.classes.insert(class.fq_name.as_str(), class);
        for nested in class.nested_classes() {
            self.insert_recursive(nested);
        }
    }
}

impl SourceFile {
    pub fn new(path: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
            declarations: Vec::new(),
        }
    }

    pub fn with(mut self, decl: Declaration) -> Self {
        self.declarations.push(decl);
        self
    }
}

impl ModuleGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: SourceFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_dependency(mut self, class: ClassDecl) -> Self {
        self.dependencies.push(class);
        self
    }

    /// Parse a graph from its JSON form.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read a graph from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Index every class in the module and its dependencies, nested classes
    /// included. Module classes shadow dependency classes of the same name.
    pub fn class_index(&self) -> ClassIndex<'_> {
        let mut index = ClassIndex::default();
        for class in &self.dependencies {
            index.insert_recursive(class);
        }
        for file in &self.files {
            for decl in &file.declarations {
                if let Declaration::Class(class) = decl {
                    index.insert_recursive(class);
                }
            }
        }
        index
    }

    /// Every declaration in the module, depth first, parents before
    /// children, in declaration order.
    pub fn walk(&self) -> Vec<(DeclPath, &Declaration)> {
        fn visit<'g>(
            path: DeclPath,
            decl: &'g Declaration,
            out: &mut Vec<(DeclPath, &'g Declaration)>,
        ) {
            out.push((path.clone(), decl));
            if let Declaration::Class(class) = decl {
                for (idx, child) in class.declarations.iter().enumerate() {
                    visit(path.child(idx), child, out);
                }
            }
        }

        let mut out = Vec::new();
        for (file_idx, file) in self.files.iter().enumerate() {
            for (idx, decl) in file.declarations.iter().enumerate() {
                let path = DeclPath {
                    file: file_idx,
                    indices: vec![idx],
                };
                visit(path, decl, &mut out);
            }
        }
        out
    }

    pub fn declaration(&self, path: &DeclPath) -> Option<&Declaration> {
        let file = self.files.get(path.file)?;
        let (first, rest) = path.indices.split_first()?;
        let mut decl = file.declarations.get(*first)?;
        for idx in rest {
            match decl {
                Declaration::Class(class) => decl = class.declarations.get(*idx)?,
                _ => return None,
            }
        }
        Some(decl)
    }

    pub fn declaration_mut(&mut self, path: &DeclPath) -> Result<&mut Declaration> {
        let invalid = || ModelError::InvalidPath {
            path: path.to_string(),
        };
        let file = self.files.get_mut(path.file).ok_or_else(invalid)?;
        let (first, rest) = path.indices.split_first().ok_or_else(invalid)?;
        let mut decl = file.declarations.get_mut(*first).ok_or_else(invalid)?;
        for idx in rest {
            match decl {
                Declaration::Class(class) => {
                    decl = class.declarations.get_mut(*idx).ok_or_else(invalid)?
                }
                _ => return Err(invalid()),
            }
        }
        Ok(decl)
    }

    /// Qualified names of every declaration carrying the export marker.
    pub fn exported_names(&self) -> Vec<QualifiedName> {
        self.walk()
            .into_iter()
            .filter(|(_, decl)| decl.is_exported())
            .filter_map(|(_, decl)| decl.fq_name().cloned())
            .collect()
    }
}
