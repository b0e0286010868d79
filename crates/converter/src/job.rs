//! Conversion jobs and output path templates.

use std::path::{Path, PathBuf};

use tgsrender_render_engine::RenderOptions;

/// Output path template.
///
/// `{stem}` expands to the input file stem and `{dir}` to the input's
/// parent directory (`.` when it has none). Anything else, including
/// renderer frame patterns such as `%d`, passes through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate(String);

impl OutputTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether distinct inputs can map to distinct outputs.
    pub fn is_per_input(&self) -> bool {
        self.0.contains("{stem}")
    }

    /// Output path for `input`.
    pub fn resolve(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
            _ => ".".to_string(),
        };
        PathBuf::from(self.0.replace("{dir}", &dir).replace("{stem}", &stem))
    }
}

/// One input file to convert. Built right before the batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Caller size overrides, merged over configured defaults at render time.
    pub options: RenderOptions,
}

/// Build one job per input, in order.
pub fn plan_jobs(
    inputs: &[PathBuf],
    template: &OutputTemplate,
    options: RenderOptions,
) -> Vec<ConversionJob> {
    inputs
        .iter()
        .map(|input| ConversionJob {
            input: input.clone(),
            output: template.resolve(input),
            options,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_template_writes_next_to_input() {
        let template = OutputTemplate::new("{dir}/{stem}.gif");
        assert_eq!(
            template.resolve(Path::new("/stickers/pack/heart.tgs")),
            PathBuf::from("/stickers/pack/heart.gif")
        );
        assert_eq!(
            template.resolve(Path::new("heart.tgs")),
            PathBuf::from("./heart.gif")
        );
    }

    #[test]
    fn test_frame_pattern_passes_through() {
        let template = OutputTemplate::new("frames/{stem}-%d.png");
        assert_eq!(
            template.resolve(Path::new("a/wave.tgs")),
            PathBuf::from("frames/wave-%d.png")
        );
    }

    #[test]
    fn test_plan_jobs_shares_options() {
        let inputs = vec![PathBuf::from("a.tgs"), PathBuf::from("b.tgs")];
        let options = RenderOptions::new(Some(100), Some(200));
        let jobs = plan_jobs(&inputs, &OutputTemplate::new("out/{stem}.mp4"), options);

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].output, PathBuf::from("out/a.mp4"));
        assert_eq!(jobs[1].output, PathBuf::from("out/b.mp4"));
        assert!(jobs.iter().all(|job| job.options == options));
    }

    #[test]
    fn test_is_per_input() {
        assert!(OutputTemplate::new("{stem}.gif").is_per_input());
        assert!(!OutputTemplate::new("out.gif").is_per_input());
    }

    proptest! {
        #[test]
        fn prop_fixed_template_is_unchanged(name in "[a-z0-9_]{1,12}", out in "[a-z0-9_/]{1,16}\\.png") {
            let template = OutputTemplate::new(out.clone());
            let input = PathBuf::from(format!("{name}.tgs"));
            prop_assert_eq!(template.resolve(&input), PathBuf::from(out));
        }

        #[test]
        fn prop_stem_is_substituted(dir in "[a-z]{1,8}", name in "[a-z0-9_-]{1,12}") {
            let template = OutputTemplate::new("{dir}/{stem}.webm");
            let input = PathBuf::from(&dir).join(format!("{name}.tgs"));
            prop_assert_eq!(
                template.resolve(&input),
                PathBuf::from(format!("{dir}/{name}.webm"))
            );
        }
    }
}
