pub mod upstream; // Shared bearer-authenticated provider transport
pub mod canvas; // Chat turn: prompt, completion, extraction, validation
pub mod imaging; // Node illustrations
