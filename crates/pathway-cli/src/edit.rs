//! Edit command implementation for Pathway CLI.
//!
//! Replays a script of editor gestures against one process, then validates
//! and saves the catalogue.
//!
//! Script lines, one gesture each (blank lines and `#` comments are skipped):
//!
//! ```text
//! select X Y        select the module or route under the point
//! drag DX DY        move the selected module
//! project X Y       drag a new route out of the selected module
//! release [default] commit the projected route
//! cancel            abandon the projected route
//! delete            delete the selected module or route
//! toggle-default    flip the selected route's default flag
//! add NAME X Y      place a module, creating it in the catalogue if needed
//! auto-layout       lay the whole process out again
//! ```

use std::fs;
use std::str::FromStr;

use anyhow::Context;
use pathway_core::{Catalogue, GraphEditor, PathwayConfig};

use crate::colors;
use crate::loader::{self, LoadedCatalogue};

/// One editor gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    Select { x: i32, y: i32 },
    Drag { dx: i32, dy: i32 },
    Project { x: i32, y: i32 },
    Release { default: bool },
    Cancel,
    Delete,
    ToggleDefault,
    Add { name: String, x: i32, y: i32 },
    AutoLayout,
}

impl FromStr for Gesture {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or("empty gesture")?;
        let args: Vec<&str> = words.collect();

        let gesture = match (verb, args.as_slice()) {
            ("select", [x, y]) => Gesture::Select {
                x: coordinate(x)?,
                y: coordinate(y)?,
            },
            ("drag", [dx, dy]) => Gesture::Drag {
                dx: coordinate(dx)?,
                dy: coordinate(dy)?,
            },
            ("project", [x, y]) => Gesture::Project {
                x: coordinate(x)?,
                y: coordinate(y)?,
            },
            ("release", []) => Gesture::Release { default: false },
            ("release", ["default"]) => Gesture::Release { default: true },
            ("cancel", []) => Gesture::Cancel,
            ("delete", []) => Gesture::Delete,
            ("toggle-default", []) => Gesture::ToggleDefault,
            // Module names may contain spaces; the last two words are the point
            ("add", [name @ .., x, y]) if !name.is_empty() => Gesture::Add {
                name: name.join(" "),
                x: coordinate(x)?,
                y: coordinate(y)?,
            },
            ("auto-layout", []) => Gesture::AutoLayout,
            (
                "select" | "drag" | "project" | "release" | "cancel" | "delete"
                | "toggle-default" | "add" | "auto-layout",
                _,
            ) => return Err(format!("wrong arguments for '{}'", verb)),
            _ => return Err(format!("unknown gesture '{}'", verb)),
        };
        Ok(gesture)
    }
}

fn coordinate(word: &str) -> Result<i32, String> {
    word.parse()
        .map_err(|_| format!("'{}' is not a whole number", word))
}

/// Parse a gesture script into gestures tagged with their line numbers.
pub fn parse_script(text: &str) -> anyhow::Result<Vec<(usize, Gesture)>> {
    let mut gestures = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let gesture = line
            .parse::<Gesture>()
            .map_err(|e| anyhow::anyhow!("line {}: {}", index + 1, e))?;
        gestures.push((index + 1, gesture));
    }
    Ok(gestures)
}

/// Execute the edit command.
pub fn execute(
    catalogue_path: &str,
    process_name: &str,
    script_path: &str,
    output: Option<&str>,
    config: &PathwayConfig,
) -> anyhow::Result<()> {
    let script = fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script {}", script_path))?;
    let gestures = parse_script(&script).with_context(|| format!("Invalid script {}", script_path))?;

    let mut loaded = LoadedCatalogue::open(catalogue_path, config)?;
    colors::print_header("Pathway Edit", &loaded.display_name());
    loaded.report_cyclic();

    let id = loaded.process_id(process_name)?;
    if loaded.is_cyclic(id) {
        anyhow::bail!(
            "Process '{}' has cyclic routes; fix the catalogue file before editing it",
            process_name
        );
    }

    // The session edits a copy of the routes so that placed modules can join the catalogue
    let mut layout = loaded.layouts.remove(id).unwrap_or_default();
    let mut pairs = loaded
        .catalogue
        .process(id)
        .map(|process| process.pairs.clone())
        .unwrap_or_default();

    let mut rejected = 0;
    {
        let mut editor = GraphEditor::new(&mut pairs, &mut layout, config.editor);
        for (line, gesture) in &gestures {
            let applied = apply(&mut editor, gesture, &mut loaded.catalogue, config)?;
            tracing::debug!("line {}: {:?} -> {:?}", line, gesture, editor.state());
            if !applied {
                rejected += 1;
                println!(
                    "  {}line {}: {:?} had no effect{}",
                    colors::DIM,
                    line,
                    gesture,
                    colors::RESET
                );
            }
        }
    }

    let process = loaded
        .catalogue
        .process_mut(id)
        .with_context(|| format!("No process named '{}'", process_name))?;
    process.pairs = pairs;
    let route_count = process.pairs.len();
    loaded.layouts.insert(id, layout);

    println!(
        "  Applied {} of {} gestures; {} now has {} routes",
        gestures.len() - rejected,
        gestures.len(),
        process_name,
        route_count
    );

    let report = loaded.problems();
    if report.has_problems() {
        println!(
            "{}warning:{} saving with unresolved problems",
            colors::YELLOW,
            colors::RESET
        );
    }
    loader::print_report(&report);

    loaded.save(output)?;
    Ok(())
}

/// Apply one gesture. Returns whether it changed anything.
///
/// A module named by `add` joins the catalogue only once it has been placed.
fn apply(
    editor: &mut GraphEditor<'_>,
    gesture: &Gesture,
    catalogue: &mut Catalogue,
    config: &PathwayConfig,
) -> anyhow::Result<bool> {
    let applied = match gesture {
        Gesture::Select { x, y } => {
            if let Some(module) = editor.module_at(*x, *y) {
                editor.select(Some(module));
            } else {
                let edge = editor.edge_at(*x, *y);
                editor.select_edge(edge);
            }
            true
        }
        Gesture::Drag { dx, dy } => editor.move_selected(*dx, *dy),
        Gesture::Project { x, y } => editor.project_path(*x, *y),
        Gesture::Release { default } => editor.release_projected_path(*default),
        Gesture::Cancel => editor.cancel_projected_path(),
        Gesture::Delete => editor.delete_selected(),
        Gesture::ToggleDefault => editor.toggle_selected_edge_default(),
        Gesture::Add { name, x, y } => match catalogue.find_module(name) {
            Some(module) => editor.add_module(module, *x, *y),
            None => {
                let placed = editor.add_module(catalogue.next_module(), *x, *y);
                if placed {
                    catalogue.add_module(name.clone());
                }
                placed
            }
        },
        Gesture::AutoLayout => {
            editor.auto_layout(&config.layout)?;
            true
        }
    };
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathway_core::{Module, ModuleLayout, ModulePair, Position};

    #[test]
    fn test_parse_gestures() {
        let script = "\
# build a route
select 0 0
project 80 80
release default

add Library prep 40 80
drag -10 5
toggle-default
auto-layout
";
        let gestures = parse_script(script).unwrap();
        assert_eq!(gestures.len(), 7);
        assert_eq!(gestures[0], (2, Gesture::Select { x: 0, y: 0 }));
        assert_eq!(gestures[2], (4, Gesture::Release { default: true }));
        assert_eq!(
            gestures[3].1,
            Gesture::Add {
                name: "Library prep".to_string(),
                x: 40,
                y: 80
            }
        );
        assert_eq!(gestures[4].1, Gesture::Drag { dx: -10, dy: 5 });
        assert_eq!(gestures[6].1, Gesture::AutoLayout);
    }

    #[test]
    fn test_parse_error_names_line() {
        let err = parse_script("select 0 0\ndrag left 4\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: 'left' is not a whole number");

        let err = parse_script("fly 1 2").unwrap_err();
        assert_eq!(err.to_string(), "line 1: unknown gesture 'fly'");

        let err = parse_script("release now").unwrap_err();
        assert_eq!(err.to_string(), "line 1: wrong arguments for 'release'");
    }

    fn sentinels(gap: i32) -> ModuleLayout {
        [
            (Module::Start, Position::new(0, 0)),
            (Module::End, Position::new(0, gap)),
        ]
        .into_iter()
        .collect()
    }

    fn add(name: &str) -> Gesture {
        Gesture::Add {
            name: name.to_string(),
            x: 0,
            y: 40,
        }
    }

    #[test]
    fn test_refused_add_leaves_catalogue_alone() {
        let config = PathwayConfig::default();
        let mut catalogue = Catalogue::new();
        let mut pairs = vec![ModulePair::new(Module::Start, Module::End, true)];
        let mut layout = sentinels(1);
        let mut editor = GraphEditor::new(&mut pairs, &mut layout, config.editor);

        assert!(!apply(&mut editor, &add("B"), &mut catalogue, &config).unwrap());
        assert!(catalogue.modules().is_empty());
        assert_eq!(editor.layout().len(), 2);
    }

    #[test]
    fn test_placed_add_joins_catalogue() {
        let config = PathwayConfig::default();
        let mut catalogue = Catalogue::new();
        let existing = catalogue.add_module("A");
        let mut pairs = Vec::new();
        let mut layout = sentinels(80);
        let mut editor = GraphEditor::new(&mut pairs, &mut layout, config.editor);

        assert!(apply(&mut editor, &add("B"), &mut catalogue, &config).unwrap());
        let b = catalogue.find_module("B").unwrap();
        assert_eq!(editor.position(b), Some(Position::new(0, 40)));

        // Known names reuse their module
        assert!(apply(&mut editor, &add("A"), &mut catalogue, &config).unwrap());
        assert!(editor.position(existing).is_some());
        assert_eq!(catalogue.modules().len(), 2);
    }

    #[test]
    fn test_add_needs_a_name() {
        assert!("add 1 2".parse::<Gesture>().is_err());
    }
}
