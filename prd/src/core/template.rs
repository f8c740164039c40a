//! Bootstrap document installed when automated repair has failed.
//!
//! The single `setup` entry hands the problem back to the agent. When a backup
//! exists its content is pulled in through an `@{path}` marker, expanded later
//! by [`crate::io::references`].

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use minijinja::{Environment, context};

use crate::entry::{Category, Entry, category_list};

const REBUILD_TEMPLATE: &str = include_str!("templates/rebuild_from_backup.md");
const START_FRESH_TEMPLATE: &str = include_str!("templates/start_fresh.md");

static TEMPLATES: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.add_template("rebuild_from_backup", REBUILD_TEMPLATE)
        .expect("rebuild_from_backup template should be valid");
    env.add_template("start_fresh", START_FRESH_TEMPLATE)
        .expect("start_fresh template should be valid");
    env
});

/// Build the one-entry bootstrap document.
pub fn create_template_prd(backup_path: Option<&Path>) -> Result<Vec<Entry>> {
    let (description, step) = match backup_path {
        Some(path) => {
            let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
            let backup_path = absolute.display().to_string();
            let step = render(
                "rebuild_from_backup",
                context! {
                    backup_marker => format!("@{{{backup_path}}}"),
                    backup_path => backup_path,
                    categories => category_list(),
                },
            )?;
            ("Rebuild the PRD from the latest backup", step)
        }
        None => (
            "Create the PRD task list",
            render("start_fresh", context! { categories => category_list() })?,
        ),
    };
    Ok(vec![Entry::new(Category::Setup, description, vec![step])])
}

fn render(name: &str, ctx: minijinja::Value) -> Result<String> {
    let template = TEMPLATES.get_template(name)?;
    let rendered = template
        .render(ctx)
        .with_context(|| format!("render {name} template"))?;
    Ok(rendered.trim().to_string())
}
