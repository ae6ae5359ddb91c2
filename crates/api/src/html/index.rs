pub const INDEX_HTML: &str = r##"<!doctype html>
<html lang="en">

<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <link rel="preconnect" href="https://fonts.googleapis.com" />
  <link href="https://fonts.googleapis.com/css2?family=Poppins:wght@300;400;600;700&display=swap" rel="stylesheet" />
  <style>
    :root {
      --accent-from: #6a11cb;
      --accent-to: #2575fc;
      --muted: #6c757d;
      --text: #495057;
    }

    * { box-sizing: border-box; }

    body {
      font-family: 'Poppins', sans-serif;
      max-width: 760px;
      margin: 0 auto;
      padding: 32px 16px 80px;
      color: var(--text);
    }

    .header {
      font-size: 42px;
      font-weight: 700;
      background: linear-gradient(135deg, var(--accent-from) 0%, var(--accent-to) 100%);
      -webkit-background-clip: text;
      -webkit-text-fill-color: transparent;
      text-align: center;
      margin: 0 0 10px;
    }

    .lead { text-align: center; font-size: 18px; }

    .tabs { display: flex; justify-content: center; margin: 25px 0; }

    .tab {
      padding: 12px 24px;
      background: #f0f5ff;
      border: none;
      border-radius: 30px;
      margin: 0 10px;
      cursor: pointer;
      font-family: inherit;
      font-weight: 600;
      transition: all 0.3s ease;
    }

    .tab.active {
      background: linear-gradient(135deg, var(--accent-from) 0%, var(--accent-to) 100%);
      color: white;
      box-shadow: 0 4px 12px rgba(37, 117, 252, 0.3);
    }

    .panel { display: none; }
    .panel.active { display: block; }

    .upload-area {
      border: 2px dashed var(--accent-to);
      border-radius: 20px;
      padding: 40px 20px;
      text-align: center;
      cursor: pointer;
      transition: all 0.3s ease;
    }

    .upload-area.dragging { background: #f0f5ff; }

    .hint { color: var(--muted); margin-top: 10px; }

    .camera-container {
      border-radius: 20px;
      overflow: hidden;
      box-shadow: 0 8px 25px rgba(0, 0, 0, 0.15);
      margin-bottom: 20px;
    }

    .camera-container video { width: 100%; display: block; }

    .action-btn {
      display: block;
      width: 100%;
      padding: 14px;
      background: linear-gradient(135deg, var(--accent-from) 0%, var(--accent-to) 100%);
      color: white;
      border: none;
      border-radius: 12px;
      font-family: inherit;
      font-size: 18px;
      font-weight: 600;
      cursor: pointer;
      margin-top: 16px;
      transition: all 0.3s ease;
    }

    .action-btn:disabled {
      opacity: 0.6;
      cursor: wait;
    }

    .action-btn:hover {
      transform: translateY(-3px);
      box-shadow: 0 6px 15px rgba(37, 117, 252, 0.4);
    }

    .hidden { display: none !important; }

    .columns {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 24px;
      margin-top: 30px;
      align-items: start;
    }

    .preview img { width: 100%; border-radius: 15px; }
    .preview figcaption { text-align: center; color: var(--muted); font-size: 14px; }

    .spinner { text-align: center; color: var(--muted); padding: 30px 0; }

    .result-box {
      background: linear-gradient(135deg, #f5f7fa 0%, #e4edff 100%);
      border-radius: 15px;
      padding: 25px;
      box-shadow: 0 8px 16px rgba(37, 117, 252, 0.1);
    }

    .result-title { text-align: center; margin-top: 0; }
    .result-confidence { text-align: center; font-size: 20px; margin-top: -10px; }
    .result-band, .result-hint { text-align: center; }
    .error-box .result-title { color: #c0392b; }

    .confidence-bar {
      height: 12px;
      background: #e0e7ff;
      border-radius: 10px;
      margin: 15px 0;
      overflow: hidden;
    }

    .confidence-fill {
      height: 100%;
      background: linear-gradient(90deg, var(--accent-from) 0%, var(--accent-to) 100%);
      border-radius: 10px;
      transition: width 0.5s ease-in-out;
    }

    footer {
      position: fixed;
      bottom: 0;
      left: 0;
      width: 100%;
      text-align: center;
      padding: 10px;
      color: var(--muted);
      font-size: 12px;
      background: white;
      border-top: 1px solid #eee;
    }

    @media (max-width: 640px) {
      .columns { grid-template-columns: 1fr; }
    }
  </style>
</head>

<body>
  <p class="header">{{TITLE}}</p>
  <p class="lead">{{LEAD}}</p>

  <div class="tabs">
    <button class="tab active" data-panel="upload-panel">📁 Upload Image</button>
    <button class="tab" data-panel="camera-panel">📸 Capture from Webcam</button>
  </div>

  <section id="upload-panel" class="panel active">
    <label class="upload-area" id="drop-zone">
      <strong>DRAG &amp; DROP IMAGE HERE</strong>
      <p class="hint">or click to browse. Supported formats: JPG, JPEG, PNG</p>
      <input id="file-input" type="file" accept=".jpg,.jpeg,.png,image/jpeg,image/png" hidden />
    </label>
  </section>

  <section id="camera-panel" class="panel">
    <p class="lead">Position your face in the frame and click capture</p>
    <button id="open-camera" class="action-btn">🎥 Open Camera</button>
    <div id="camera-box" class="camera-container hidden">
      <video id="camera-video" autoplay playsinline muted></video>
    </div>
    <button id="capture" class="action-btn hidden">📸 Take a picture</button>
    <button id="retake" class="action-btn hidden">🔄 Retake Photo</button>
    <canvas id="capture-canvas" class="hidden"></canvas>
  </section>

  <div id="columns" class="columns hidden">
    <figure class="preview">
      <img id="preview-img" alt="Your image" />
      <figcaption>Your Image</figcaption>
    </figure>
    <div>
      <div id="spinner" class="spinner hidden">Analyzing image...</div>
      <div id="result"></div>
    </div>
  </div>

  <footer>{{FOOTER}}</footer>

  <script>
    const tabs = document.querySelectorAll('.tab');
    const fileInput = document.getElementById('file-input');
    const dropZone = document.getElementById('drop-zone');
    const openCamera = document.getElementById('open-camera');
    const cameraBox = document.getElementById('camera-box');
    const video = document.getElementById('camera-video');
    const captureBtn = document.getElementById('capture');
    const retakeBtn = document.getElementById('retake');
    const canvas = document.getElementById('capture-canvas');
    const columns = document.getElementById('columns');
    const previewImg = document.getElementById('preview-img');
    const spinner = document.getElementById('spinner');
    const result = document.getElementById('result');
    let stream = null;
    let previewUrl = null;

    tabs.forEach((tab) => tab.addEventListener('click', () => {
      tabs.forEach((t) => t.classList.toggle('active', t === tab));
      document.querySelectorAll('.panel').forEach((panel) => {
        panel.classList.toggle('active', panel.id === tab.dataset.panel);
      });
      if (tab.dataset.panel !== 'camera-panel') {
        stopCamera();
      }
    }));

    function show(el, visible) {
      el.classList.toggle('hidden', !visible);
    }

    function clearResult() {
      show(columns, false);
      result.innerHTML = '';
    }

    async function classify(blob, source) {
      if (previewUrl) {
        URL.revokeObjectURL(previewUrl);
      }
      previewUrl = URL.createObjectURL(blob);
      previewImg.src = previewUrl;
      show(columns, true);
      show(spinner, true);
      result.innerHTML = '';

      const form = new FormData();
      form.append('source', source);
      form.append('image', blob, source === 'camera' ? 'capture.jpg' : (blob.name || 'upload'));

      try {
        const response = await fetch('classify', { method: 'POST', body: form });
        const text = await response.text();
        if (response.status === 429) {
          result.innerHTML = '<div class="result-box error-box"><p class="result-band">Too many requests, please wait a moment.</p></div>';
        } else {
          result.innerHTML = text;
        }
      } catch (err) {
        result.innerHTML = '<div class="result-box error-box"><p class="result-band">Network error, please retry.</p></div>';
      } finally {
        show(spinner, false);
      }
    }

    fileInput.addEventListener('change', () => {
      if (fileInput.files.length > 0) {
        resetCapture();
        classify(fileInput.files[0], 'upload');
      }
      fileInput.value = '';
    });

    ['dragenter', 'dragover'].forEach((name) => dropZone.addEventListener(name, (event) => {
      event.preventDefault();
      dropZone.classList.add('dragging');
    }));

    ['dragleave', 'drop'].forEach((name) => dropZone.addEventListener(name, (event) => {
      event.preventDefault();
      dropZone.classList.remove('dragging');
    }));

    dropZone.addEventListener('drop', (event) => {
      const file = event.dataTransfer.files[0];
      if (file) {
        resetCapture();
        classify(file, 'upload');
      }
    });

    async function startCamera() {
      try {
        stream = await navigator.mediaDevices.getUserMedia({ video: true, audio: false });
      } catch (err) {
        result.innerHTML = '<div class="result-box error-box"><p class="result-band">Camera unavailable: ' + err.name + '</p></div>';
        show(columns, true);
        return;
      }
      captureBtn.disabled = true;
      video.srcObject = stream;
      show(openCamera, false);
      show(retakeBtn, false);
      show(cameraBox, true);
      show(captureBtn, true);
    }

    function stopCamera() {
      if (stream) {
        stream.getTracks().forEach((track) => track.stop());
        stream = null;
      }
      video.srcObject = null;
      show(cameraBox, false);
      show(captureBtn, false);
    }

    function resetCapture() {
      stopCamera();
      show(retakeBtn, false);
      show(openCamera, true);
    }

    openCamera.addEventListener('click', () => {
      clearResult();
      startCamera();
    });

    video.addEventListener('loadedmetadata', () => {
      captureBtn.disabled = false;
    });

    function showCameraError(message) {
      show(columns, true);
      show(spinner, false);
      result.innerHTML = '<div class="result-box error-box"><p class="result-band">' + message + '</p></div>';
    }

    captureBtn.addEventListener('click', () => {
      if (!video.videoWidth || !video.videoHeight) {
        showCameraError('Camera is still starting, please try again in a moment.');
        return;
      }
      canvas.width = video.videoWidth;
      canvas.height = video.videoHeight;
      canvas.getContext('2d').drawImage(video, 0, 0);
      stopCamera();
      show(retakeBtn, true);
      canvas.toBlob((blob) => {
        if (blob) {
          classify(blob, 'camera');
        } else {
          showCameraError('Could not capture a photo, please retake.');
        }
      }, 'image/jpeg', 0.92);
    });

    retakeBtn.addEventListener('click', () => {
      clearResult();
      startCamera();
    });
  </script>
</body>

</html>
"##;
