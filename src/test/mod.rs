mod playback;
mod surface_registry;
