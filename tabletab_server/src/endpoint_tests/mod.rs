mod helpers;
mod mocks;

mod menu;
mod orders;
