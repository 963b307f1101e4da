use std::{
    io::Stdout,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{RecvTimeoutError, Sender},
    },
    time::Duration,
};

use crossterm::event::{self, KeyCode};

use crate::app::renderer;
use crate::player::Player;
use crate::trace::Step;

enum UserInputEvent {
    KeyPress(event::KeyEvent),
    Resize,
}

/// Timeout for polling input events in the input thread, a.k.a.
/// how often to check the stop flag
const USER_INPUT_EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);
/// Receive timeout while paused; while playing the player's interval is the
/// timeout, which makes the receive loop double as the playback timer
const IDLE_RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Runs the playback loop for one trace until the user leaves the page.
///
/// `draw` renders the algorithm-specific canvas for the step under the
/// cursor (or the bare problem instance when playback has not started).
/// The loop itself owns the status line and the player transitions. The
/// `recv_timeout` on the input channel is the single cooperative timer:
/// each timeout while playing is one tick, so no second timer can exist.
pub fn run_playback<S, F>(
    stdout: &mut Stdout,
    mut player: Player<S>,
    mut draw: F,
) -> std::io::Result<()>
where
    S: Step,
    F: FnMut(&mut Stdout, Option<&S>) -> std::io::Result<()>,
{
    let should_stop = Arc::new(AtomicBool::new(false));
    let (user_input_event_tx, user_input_event_rx) =
        std::sync::mpsc::channel::<UserInputEvent>();
    let should_stop_for_input = should_stop.clone();
    // Spawn a thread to listen for user input
    let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
        listen_to_user_input(
            user_input_event_tx,
            USER_INPUT_EVENT_POLL_TIMEOUT,
            &should_stop_for_input,
        )
    });

    draw(stdout, player.current())?;
    renderer::draw_status(stdout, &player)?;

    loop {
        let timeout = if player.is_playing() {
            player.interval()
        } else {
            IDLE_RECV_TIMEOUT
        };

        // Whether the canvas needs redrawing (the status line always does)
        let mut dirty = false;
        match user_input_event_rx.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => {
                // Timer tick: advances the cursor by one while playing
                dirty = player.tick();
            }
            Err(RecvTimeoutError::Disconnected) => {
                // Input thread has exited, leave the page
                break;
            }
            Ok(UserInputEvent::Resize) => {
                dirty = true;
            }
            Ok(UserInputEvent::KeyPress(key_event)) => match key_event.code {
                KeyCode::Esc => {
                    tracing::debug!("[playback] Esc pressed, leaving page");
                    should_stop.store(true, Ordering::Release);
                    break;
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if player.is_playing() {
                        player.pause();
                    } else {
                        player.play();
                    }
                }
                // Manual stepping is only allowed while paused
                KeyCode::Right if !player.is_playing() => {
                    player.step_forward();
                    dirty = true;
                }
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    player.reset();
                    dirty = true;
                }
                KeyCode::Up => {
                    player.speed_up();
                }
                KeyCode::Down => {
                    player.slow_down();
                }
                _ => {}
            },
        }

        if dirty {
            draw(stdout, player.current())?;
        }
        renderer::draw_status(stdout, &player)?;
    }

    // Wait for input thread to finish
    input_thread_handle.join().expect("Input thread panicked")?;
    Ok(())
}

/// Listen for user input events (key presses and resize)
/// This function runs in a separate thread, and is the only place where user input is read
fn listen_to_user_input(
    user_input_event_tx: Sender<UserInputEvent>,
    event_poll_timeout: Duration,
    should_stop: &AtomicBool,
) -> std::io::Result<()> {
    loop {
        // Check if this thread should exit
        if should_stop.load(Ordering::Acquire) {
            return Ok(());
        }

        // Poll for events with a timeout
        if !event::poll(event_poll_timeout)? {
            // No event available, continue loop to check the flag again
            continue;
        }

        let input_event = match event::read()? {
            event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                UserInputEvent::KeyPress(key_event)
            }
            event::Event::Resize(_, _) => UserInputEvent::Resize,
            _ => continue, // Ignore other events
        };

        // Should exit input thread on Esc key
        let should_exit = matches!(
            input_event,
            UserInputEvent::KeyPress(event::KeyEvent {
                code: KeyCode::Esc,
                ..
            })
        );

        // Send the input event to the playback loop
        if user_input_event_tx.send(input_event).is_err() {
            // Receiver has been dropped, exit the thread
            return Ok(());
        }

        if should_exit {
            tracing::debug!("[input loop] Esc key pressed, exiting");
            return Ok(());
        }
    }
}
