// Answer coaching: question classification, prompt building, synthesis and shaping.
// Pure parts (classifier, shaper, prompts) never touch the network.

pub mod classifier;
pub mod handlers;
pub mod prompts;
pub mod shaper;
pub mod synthesizer;
