use std::io::{BufRead, Write};

use crate::domain::errors::{DomainError, Result};
use crate::domain::value_objects::CameraInfo;

/// Prints the camera menu and resolves the operator's choice
pub struct SourceSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> SourceSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// `preselected` is a position in `sources`; when set, no prompt is shown.
    /// A single source is used without asking.
    pub fn select(
        &mut self,
        sources: &[CameraInfo],
        preselected: Option<usize>,
    ) -> Result<CameraInfo> {
        if sources.is_empty() {
            return Err(DomainError::NoDevicesFound);
        }

        writeln!(self.output, "\nAvailable video sources:")?;
        for (position, source) in sources.iter().enumerate() {
            writeln!(self.output, "{}", source.menu_line(position))?;
        }

        let position = match (preselected, sources.len()) {
            (Some(position), _) => position,
            (None, 1) => 0,
            (None, _) => self.prompt()?,
        };

        sources
            .get(position)
            .cloned()
            .ok_or_else(|| DomainError::InvalidSelection(position.to_string()))
    }

    fn prompt(&mut self) -> Result<usize> {
        write!(self.output, "\nSelect video source number: ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let answer = line.trim();

        answer
            .parse::<usize>()
            .map_err(|_| DomainError::InvalidSelection(answer.to_string()))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Resolution;
    use std::io::Cursor;

    fn create_sources(count: u32) -> Vec<CameraInfo> {
        (0..count)
            .map(|i| {
                CameraInfo::new(
                    i * 2,
                    CameraInfo::fallback_name(i * 2),
                    Resolution::new(640, 480),
                    "V4L2".to_string(),
                )
            })
            .collect()
    }

    fn select(input: &str, sources: &[CameraInfo], pre: Option<usize>) -> (Result<CameraInfo>, String) {
        let mut selector = SourceSelector::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let result = selector.select(sources, pre);
        let output = String::from_utf8(selector.into_output()).unwrap();
        (result, output)
    }

    #[test]
    fn test_single_source_skips_prompt() {
        let sources = create_sources(1);
        let (result, output) = select("", &sources, None);

        assert_eq!(result.unwrap(), sources[0]);
        assert!(output.contains("0: Camera 0 (640x480) - V4L2"));
        assert!(!output.contains("Select video source number"));
    }

    #[test]
    fn test_prompt_selects_by_list_position() {
        let sources = create_sources(3);
        let (result, output) = select("2\n", &sources, None);

        assert_eq!(result.unwrap().id(), 4);
        assert!(output.contains("Select video source number: "));
        assert!(output.contains("1: Camera 2 (640x480) - V4L2"));
    }

    #[test]
    fn test_out_of_range_selection_is_error() {
        let sources = create_sources(2);
        let (result, _) = select("5\n", &sources, None);
        assert!(matches!(result, Err(DomainError::InvalidSelection(s)) if s == "5"));
    }

    #[test]
    fn test_non_numeric_selection_is_error() {
        let sources = create_sources(2);
        let (result, _) = select("front\n", &sources, None);
        assert!(matches!(result, Err(DomainError::InvalidSelection(s)) if s == "front"));
    }

    #[test]
    fn test_empty_input_is_error() {
        let sources = create_sources(2);
        let (result, _) = select("", &sources, None);
        assert!(matches!(result, Err(DomainError::InvalidSelection(_))));
    }

    #[test]
    fn test_preselected_source_skips_prompt() {
        let sources = create_sources(3);
        let (result, output) = select("", &sources, Some(1));

        assert_eq!(result.unwrap().id(), 2);
        assert!(!output.contains("Select video source number"));
    }

    #[test]
    fn test_no_sources_is_error() {
        let (result, output) = select("0\n", &[], None);
        assert!(matches!(result, Err(DomainError::NoDevicesFound)));
        assert!(output.is_empty());
    }
}
