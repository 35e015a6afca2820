use clap::Parser;
use tether_face_avatar::avatar_system::{Inputs, Outputs};
use tether_face_avatar::systems::Systems;

use env_logger::Env;
use log::{debug, error, info, warn};
use std::thread;
use std::time::Duration;
use tether_agent::TetherAgentOptionsBuilder;

use tether_face_avatar::agent_config::{self, AgentConfig};
use tether_face_avatar::avatar_system::{handle_landmarks_message, handle_viewport_message};
use tether_face_avatar::landmarks::FaceFrame;
use tether_face_avatar::settings::Cli;
use tether_face_avatar::Point2D;

fn main() {
    let cli = Cli::parse();

    // Initialize the logger from the environment

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level))
        .filter_module("paho_mqtt", log::LevelFilter::Warn)
        .filter_module("tether_agent", log::LevelFilter::Warn)
        .init();

    debug!("Started; args: {:?}", cli);

    let mut tether_agent = TetherAgentOptionsBuilder::new(&cli.agent_role)
        .id(Some(&cli.agent_group))
        .host(Some(&cli.tether_host.to_string()))
        .build()
        .expect("failed to init and/or connect Tether Agent");

    let inputs = Inputs::new(&mut tether_agent);
    let outputs = Outputs::new(&mut tether_agent);

    let mut config: AgentConfig = agent_config::load_config_from_file(&cli.config_path)
        .expect("failed to load avatar config");

    info!(
        "Loaded config OK ({} landmark roles); publish with retain=true",
        config.landmark_roles.len()
    );
    // Always publish on first start/load...
    tether_agent
        .encode_and_publish(&outputs.config_output, &config)
        .expect("failed to publish config");

    let mut systems = Systems::new(&config).expect("failed to init systems from config");

    loop {
        let mut work_done = false;

        if let Some((topic, message)) = tether_agent.check_messages() {
            work_done = true;

            if inputs.landmarks_input.matches(&topic) {
                match rmp_serde::from_slice::<FaceFrame>(&message) {
                    Ok(frame) => {
                        handle_landmarks_message(
                            &frame,
                            &config,
                            &tether_agent,
                            &mut systems,
                            &outputs,
                        );
                    }
                    Err(e) => {
                        warn!("Failed to decode faceLandmarks payload: {}", e);
                    }
                }
            }

            if inputs.viewport_input.matches(&topic) {
                match rmp_serde::from_slice::<Point2D>(&message) {
                    Ok(size) => handle_viewport_message(size, &mut systems),
                    Err(e) => {
                        warn!("Failed to decode viewportSize payload: {}", e);
                    }
                }
            }

            if inputs.save_config_input.matches(&topic) {
                if let Err(e) = config.handle_save_message(
                    &tether_agent,
                    &outputs.config_output,
                    &message,
                    &mut systems.mapper,
                    &cli.config_path,
                ) {
                    // Invalid remote config is rejected; keep running with the
                    // current one
                    error!("Config failed to update and save: {}", e);
                }
            }

            if inputs.request_config_input.matches(&topic) {
                info!("requestAvatarConfig; respond with provideAvatarConfig message");
                tether_agent
                    .encode_and_publish(&outputs.config_output, &config)
                    .expect("failed to publish config");
            }
        }

        if config.collect_data
            && systems.recorder.get_elapsed().as_millis() > config.recording_interval as u128
        {
            work_done = true;

            // Batch is cleared regardless of the publish outcome: recording
            // is at-most-once
            let batch = systems.recorder.drain();
            if !batch.is_empty() {
                debug!("Flushing {} pose samples", batch.len());
                if let Err(e) = tether_agent.encode_and_publish(&outputs.samples_output, &batch) {
                    warn!("Failed to publish {} pose samples; batch dropped: {}", batch.len(), e);
                }
            }
            systems.recorder.reset_timer();
        }

        if !work_done {
            thread::sleep(Duration::from_millis(1));
        }
    }
}
