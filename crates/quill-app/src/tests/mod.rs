
pub use emulator::EditorEmulator;
