mod audio;
mod game;
mod play;
mod preferences;
mod rendering;
mod sim;
mod ui;

use bevy::{prelude::*, window::WindowResolution};
use bevy_vector_shapes::prelude::*;

use audio::SoundPlugin;
use game::{
    AudioCommand, GAME_TITLE, GameSet, GameState, PIXEL_SCALE, Preferences, SCREEN_HEIGHT,
    SCREEN_WIDTH, SKY_COLOR, SessionEnded,
};
use play::PlayPlugin;
use rendering::RenderingPlugin;
use ui::UiPlugin;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    resolution: WindowResolution::new(
                        (SCREEN_WIDTH * PIXEL_SCALE) as u32,
                        (SCREEN_HEIGHT * PIXEL_SCALE) as u32,
                    ),
                    title: GAME_TITLE.to_string(),
                    resizable: false,
                    ..Default::default()
                }),
                ..default()
            }),
            Shape2dPlugin::default(),
        ))
        .insert_resource(ClearColor(SKY_COLOR))
        .insert_resource(Preferences::open())
        .init_resource::<GameState>()
        .add_message::<AudioCommand>()
        .add_message::<SessionEnded>()
        .configure_sets(
            Update,
            (GameSet::Input, GameSet::Simulate, GameSet::Present).chain(),
        )
        .add_plugins((SoundPlugin, PlayPlugin, RenderingPlugin, UiPlugin))
        .run();
}
