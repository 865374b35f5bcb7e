use std::collections::HashMap;

use quick_xml::de::from_str;
use serde::Deserialize;

use super::artifact::ArtifactCoordinate;
use crate::core::error::{LauncherError, LauncherResult};

/// Upper bound on nested `${...}` expansion passes.
const MAX_INTERPOLATION_PASSES: usize = 16;

/// Minimal POM model – only the fields we care about for dependency resolution.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PomDocument {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub artifact_id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub packaging: Option<String>,
    #[serde(default)]
    pub parent: Option<PomParent>,
    #[serde(default)]
    pub properties: Option<HashMap<String, String>>,
    #[serde(default)]
    pub dependencies: Option<PomDependencies>,
    #[serde(default)]
    pub dependency_management: Option<PomDependencyManagement>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PomParent {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct PomDependencies {
    #[serde(default, rename = "dependency")]
    pub items: Vec<PomDependency>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PomDependencyManagement {
    #[serde(default)]
    pub dependencies: Option<PomDependencies>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub optional: Option<String>,
    #[serde(rename = "type", default)]
    pub dep_type: Option<String>,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default)]
    pub exclusions: Option<PomExclusions>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct PomExclusions {
    #[serde(default, rename = "exclusion")]
    pub items: Vec<PomExclusion>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PomExclusion {
    pub group_id: String,
    pub artifact_id: String,
}

impl PomExclusion {
    /// `*` matches any group or artifact id.
    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        (self.group_id == "*" || self.group_id == group_id)
            && (self.artifact_id == "*" || self.artifact_id == artifact_id)
    }
}

impl PomDependency {
    pub fn exclusion_list(&self) -> Vec<PomExclusion> {
        self.exclusions
            .as_ref()
            .map(|e| e.items.clone())
            .unwrap_or_default()
    }

    fn is_optional(&self) -> bool {
        self.optional.as_deref().map(str::trim) == Some("true")
    }

    fn management_key(&self) -> (String, String, String, String) {
        (
            self.group_id.clone(),
            self.artifact_id.clone(),
            self.dep_type.clone().unwrap_or_else(|| "jar".into()),
            self.classifier.clone().unwrap_or_default(),
        )
    }
}

impl PomDocument {
    /// Parse a POM XML string into a `PomDocument`.
    pub fn parse(xml: &str) -> LauncherResult<Self> {
        let doc: PomDocument = from_str(xml)?;
        Ok(doc)
    }

    /// `groupId`, inherited from the parent when the POM omits it.
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// `version`, inherited from the parent when the POM omits it.
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// Coordinate of the parent POM, if any.
    pub fn parent_coordinate(&self) -> Option<ArtifactCoordinate> {
        self.parent.as_ref().map(|p| {
            ArtifactCoordinate::new(
                p.group_id.trim(),
                p.artifact_id.trim(),
                "pom",
                "",
                p.version.trim(),
            )
        })
    }

    fn dependency_items(&self) -> &[PomDependency] {
        self.dependencies
            .as_ref()
            .map(|d| d.items.as_slice())
            .unwrap_or_default()
    }

    fn managed_items(&self) -> &[PomDependency] {
        self.dependency_management
            .as_ref()
            .and_then(|dm| dm.dependencies.as_ref())
            .map(|d| d.items.as_slice())
            .unwrap_or_default()
    }
}

/// A POM with its parent chain folded in.
///
/// Values are kept raw and interpolated on use, so inherited entries see the
/// child's `project.*` values the way Maven's model builder does.
#[derive(Debug, Clone, Default)]
pub struct EffectivePom {
    pub properties: HashMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub managed: Vec<PomDependency>,
}

impl EffectivePom {
    /// Layer `doc` over its already merged parent.
    pub fn merge(parent: Option<&EffectivePom>, doc: &PomDocument) -> LauncherResult<Self> {
        let mut merged = parent.cloned().unwrap_or_default();

        if let Some(props) = &doc.properties {
            for (key, value) in props {
                merged.properties.insert(key.clone(), value.trim().to_string());
            }
        }

        let group_id = doc
            .effective_group_id()
            .ok_or_else(|| LauncherError::PomParse("POM has no groupId".into()))?
            .trim()
            .to_string();
        let artifact_id = doc
            .artifact_id
            .as_deref()
            .ok_or_else(|| LauncherError::PomParse("POM has no artifactId".into()))?
            .trim()
            .to_string();
        let version = doc
            .effective_version()
            .ok_or_else(|| LauncherError::PomParse(format!("POM for {} has no version", artifact_id)))?
            .trim()
            .to_string();

        let mut builtins = vec![
            ("project.groupId", group_id.clone()),
            ("project.artifactId", artifact_id.clone()),
            ("project.version", version.clone()),
            ("pom.groupId", group_id.clone()),
            ("pom.artifactId", artifact_id),
            ("pom.version", version.clone()),
            ("groupId", group_id),
            ("version", version),
        ];
        if let Some(p) = &doc.parent {
            builtins.push(("project.parent.groupId", p.group_id.trim().to_string()));
            builtins.push(("project.parent.artifactId", p.artifact_id.trim().to_string()));
            builtins.push(("project.parent.version", p.version.trim().to_string()));
            builtins.push(("parent.version", p.version.trim().to_string()));
        }
        for (key, value) in builtins {
            merged.properties.insert(key.to_string(), value);
        }

        for dep in doc.dependency_items() {
            let key = dep.management_key();
            merged.dependencies.retain(|d| d.management_key() != key);
            merged.dependencies.push(dep.clone());
        }

        // First match wins in `managed`, so the child's entries go in front.
        let mut managed: Vec<PomDependency> = doc.managed_items().to_vec();
        managed.append(&mut merged.managed);
        merged.managed = managed;

        Ok(merged)
    }

    /// Expand `${name}` references. Unknown names are left in place.
    pub fn interpolate(&self, value: &str) -> String {
        let mut current = value.trim().to_string();
        for _ in 0..MAX_INTERPOLATION_PASSES {
            let next = self.interpolate_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn interpolate_once(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match self.properties.get(name) {
                        Some(v) => out.push_str(v),
                        None => {
                            out.push_str("${");
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn interpolated(&self, dep: &PomDependency) -> PomDependency {
        let opt = |v: &Option<String>| v.as_deref().map(|s| self.interpolate(s));
        PomDependency {
            group_id: self.interpolate(&dep.group_id),
            artifact_id: self.interpolate(&dep.artifact_id),
            version: opt(&dep.version),
            scope: opt(&dep.scope),
            optional: opt(&dep.optional),
            dep_type: opt(&dep.dep_type),
            classifier: opt(&dep.classifier).filter(|c| !c.is_empty()),
            exclusions: dep.exclusions.clone(),
        }
    }

    fn managed_entry(&self, dep: &PomDependency) -> Option<PomDependency> {
        let key = dep.management_key();
        self.managed
            .iter()
            .map(|m| self.interpolated(m))
            .find(|m| m.management_key() == key)
    }

    /// Append the managed dependencies of an imported BOM, interpolated with
    /// the BOM's own properties. Entries already present keep precedence.
    pub fn import_managed(&mut self, bom: &EffectivePom) {
        for dep in &bom.managed {
            self.managed.push(bom.interpolated(dep));
        }
    }

    /// `dependencyManagement` entries with `import` scope and `pom` type.
    pub fn bom_imports(&self) -> Vec<ArtifactCoordinate> {
        self.managed
            .iter()
            .map(|m| self.interpolated(m))
            .filter(|m| {
                m.scope.as_deref() == Some("import") && m.dep_type.as_deref() == Some("pom")
            })
            .filter_map(|m| {
                let version = m.version?;
                Some(ArtifactCoordinate::new(
                    m.group_id,
                    m.artifact_id,
                    "pom",
                    "",
                    version,
                ))
            })
            .collect()
    }

    /// Dependencies needed at run time: `compile` (the default) and
    /// `runtime` scopes, excluding optional ones. Values come back
    /// interpolated, with managed scope applied.
    pub fn runtime_dependencies(&self) -> Vec<PomDependency> {
        self.dependencies
            .iter()
            .map(|d| {
                let mut dep = self.interpolated(d);
                if dep.scope.is_none() {
                    dep.scope = self.managed_entry(&dep).and_then(|m| m.scope);
                }
                dep
            })
            .filter(|d| {
                let scope = d.scope.as_deref().unwrap_or("compile");
                (scope == "compile" || scope == "runtime") && !d.is_optional()
            })
            .collect()
    }

    /// Resolve a dependency version using `dependencyManagement` if explicit version is absent.
    pub fn resolve_version(&self, dep: &PomDependency) -> Option<String> {
        let version = match &dep.version {
            Some(v) => self.interpolate(v),
            None => self.managed_entry(dep)?.version?,
        };

        if version.is_empty() || version.contains("${") {
            return None;
        }
        Some(version)
    }

    /// Coordinate of an (interpolated) dependency, or `None` when no version
    /// can be determined.
    pub fn dependency_coordinate(&self, dep: &PomDependency) -> Option<ArtifactCoordinate> {
        let version = self.resolve_version(dep)?;
        let dep_type = dep.dep_type.as_deref().unwrap_or("jar");
        let (extension, default_classifier) = extension_for_type(dep_type);
        let classifier = dep
            .classifier
            .clone()
            .unwrap_or_else(|| default_classifier.to_string());

        Some(ArtifactCoordinate::new(
            dep.group_id.clone(),
            dep.artifact_id.clone(),
            extension,
            classifier,
            version,
        ))
    }
}

/// Map a dependency `type` to the file extension and implied classifier.
pub fn extension_for_type(dep_type: &str) -> (&str, &'static str) {
    match dep_type {
        "test-jar" => ("jar", "tests"),
        "java-source" => ("jar", "sources"),
        "javadoc" => ("jar", "javadoc"),
        "pom" | "war" | "ear" | "rar" | "zip" => (dep_type, ""),
        _ => ("jar", ""),
    }
}
