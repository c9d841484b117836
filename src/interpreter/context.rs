use super::SystemContext;
use std::collections::VecDeque;

pub struct StdioContext;

impl SystemContext for StdioContext {
    fn writeln(&mut self, text: &str) {
        println!("{text}");
    }

    fn readln(&mut self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }
}

pub struct BufferedContext {
    buffer: String,
    inputs: VecDeque<String>,
}

impl BufferedContext {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            inputs: VecDeque::new(),
        }
    }

    pub fn with_input(lines: &[&str]) -> Self {
        Self {
            buffer: String::new(),
            inputs: lines.iter().map(|line| line.to_string()).collect(),
        }
    }

    pub fn into_data(self) -> String {
        self.buffer
    }
}

impl Default for BufferedContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemContext for BufferedContext {
    fn writeln(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    fn readln(&mut self) -> Option<String> {
        self.inputs.pop_front()
    }
}
