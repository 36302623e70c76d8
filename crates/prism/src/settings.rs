//! Command-line values with environment fallbacks.
//!
//! Each resolver takes the flag value first, then the listed environment
//! variables in order. Lookups go through a closure so callers can pass
//! [`process_env`] or a fixed map.

use prism_pipeline::DEFAULT_STORY_ID;
use std::path::PathBuf;

/// Variables consulted for the story id.
pub const STORY_ID_VARS: &[&str] = &["STORY_ID", "example_id"];
/// Variables consulted for the task.
pub const TASK_VARS: &[&str] = &["TASK", "creative_input"];
/// Variables consulted for the output directory.
pub const OUTPUT_DIR_VARS: &[&str] = &["OUTPUT_DIR", "OUTPUT"];
/// Variables consulted for the plan path.
pub const PLAN_PATH_VARS: &[&str] = &["PLAN_PATH", "plan_path", "PLAN"];

/// Read a variable from the process environment, ignoring empty values.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn first_of(
    flag: Option<String>,
    vars: &[&str],
    lookup: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    flag.or_else(|| vars.iter().find_map(|&var| lookup(var)))
}

/// Story id: flag, `STORY_ID`, `example_id`, then `example_unknown`.
///
/// # Examples
///
/// ```
/// use prism::resolve_story_id;
///
/// let env = |name: &str| (name == "example_id").then(|| "ex_9".to_string());
/// assert_eq!(resolve_story_id(None, env), "ex_9");
/// assert_eq!(resolve_story_id(Some("cli".to_string()), env), "cli");
/// assert_eq!(resolve_story_id(None, |_| None), "example_unknown");
/// ```
pub fn resolve_story_id(flag: Option<String>, lookup: impl Fn(&str) -> Option<String>) -> String {
    first_of(flag, STORY_ID_VARS, &lookup).unwrap_or_else(|| DEFAULT_STORY_ID.to_string())
}

/// Task: flag, `TASK`, `creative_input`, then empty.
pub fn resolve_task(flag: Option<String>, lookup: impl Fn(&str) -> Option<String>) -> String {
    first_of(flag, TASK_VARS, &lookup).unwrap_or_default()
}

/// Output directory: flag, `OUTPUT_DIR`, `OUTPUT`.
pub fn resolve_output_dir(
    flag: Option<PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<PathBuf> {
    flag.or_else(|| OUTPUT_DIR_VARS.iter().find_map(|&var| lookup(var)).map(PathBuf::from))
}

/// Plan path: flag, `PLAN_PATH`, `plan_path`, `PLAN`.
pub fn resolve_plan_path(
    flag: Option<PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<PathBuf> {
    flag.or_else(|| PLAN_PATH_VARS.iter().find_map(|&var| lookup(var)).map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_story_id_prefers_first_variable() {
        let lookup = env(&[("STORY_ID", "a"), ("example_id", "b")]);
        assert_eq!(resolve_story_id(None, lookup), "a");
    }

    #[test]
    fn test_task_falls_back_to_creative_input() {
        assert_eq!(resolve_task(None, env(&[("creative_input", "A lighthouse.")])), "A lighthouse.");
        assert_eq!(resolve_task(None, env(&[])), "");
    }

    #[test]
    fn test_output_dir_fallbacks() {
        assert_eq!(
            resolve_output_dir(None, env(&[("OUTPUT", "out")])),
            Some(PathBuf::from("out"))
        );
        assert_eq!(
            resolve_output_dir(Some(PathBuf::from("flag")), env(&[("OUTPUT_DIR", "env")])),
            Some(PathBuf::from("flag"))
        );
        assert_eq!(resolve_output_dir(None, env(&[])), None);
    }

    #[test]
    fn test_plan_path_order() {
        let lookup = env(&[("plan_path", "lower.json"), ("PLAN", "plan.json")]);
        assert_eq!(
            resolve_plan_path(None, lookup),
            Some(PathBuf::from("lower.json"))
        );
    }
}
