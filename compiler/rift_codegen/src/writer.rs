//! Indented text buffer shared by the C++ and CMake generators.

/// Output buffer with an indentation level.
pub struct CodeWriter {
    /// Current indentation level.
    indent: usize,
    /// Generated text.
    output: String,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeWriter {
    pub fn new() -> Self {
        Self {
            indent: 0,
            output: String::with_capacity(1024),
        }
    }

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    /// Write a line to output (with indentation and newline).
    pub fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    /// Write a blank line.
    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Write a `// text` line.
    pub fn comment(&mut self, text: &str) {
        self.writeln(&format!("// {text}"));
    }

    /// Write a system include.
    pub fn include(&mut self, header: &str) {
        self.writeln(&format!("#include <{header}>"));
    }

    /// Take the generated output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}
